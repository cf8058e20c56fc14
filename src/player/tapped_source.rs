use rodio::{ChannelCount, Source};
use std::{
    num::NonZero,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// Pass-through source that raises `ended` once the inner source runs dry.
pub struct TappedSource<I> {
    input: I,
    ended: Arc<AtomicBool>,
}

impl<I> TappedSource<I> {
    pub fn new(input: I, ended: Arc<AtomicBool>) -> Self {
        TappedSource { input, ended }
    }
}

impl<I> Iterator for TappedSource<I>
where
    I: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        match self.input.next() {
            Some(sample) => Some(sample),
            None => {
                self.ended.store(true, Ordering::SeqCst);
                None
            }
        }
    }
}

impl<I> Source for TappedSource<I>
where
    I: Source<Item = f32>,
{
    fn channels(&self) -> ChannelCount {
        self.input.channels()
    }

    fn sample_rate(&self) -> NonZero<u32> {
        self.input.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.input.total_duration()
    }

    fn current_span_len(&self) -> Option<usize> {
        self.input.current_span_len()
    }

    fn bits_per_sample(&self) -> Option<rodio::BitDepth> {
        self.input.bits_per_sample()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.input.try_seek(pos)
    }
}
