use qview::commands::CommandAction;

pub fn run() -> anyhow::Result<()> {
    for spec in CommandAction::specs() {
        let context = spec.context.unwrap_or("Global");
        println!("{:<20} {:<8} {}", spec.config_name, context, spec.title);
    }
    Ok(())
}
