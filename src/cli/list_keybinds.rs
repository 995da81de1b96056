use qview::config::AppConfig;
use qview::keybindings::Keymap;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let (keymap, _warnings) = Keymap::from_config(config);
    for binding in keymap.bindings() {
        println!("{} = {}", binding.trigger, binding.action.config_name());
    }
    Ok(())
}
