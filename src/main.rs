fn main() -> anyhow::Result<()> {
    unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    let _log_guard = onair::logging::init()?;

    onair::app_core::OnAir::new()?.run()?;
    Ok(())
}
