use super::*;

/// Get the configuration from defaults, then tickcast.toml (if it exists), then the command line
/// arguments. args should include the program name as the first element.
pub fn build_config(args: Vec<String>) -> Result<MasterConfig, Box<dyn Error>> {
    build_config_with(real_filesystem(), args)
}

pub fn build_config_with(fs: Filesystem, args: Vec<String>) -> Result<MasterConfig, Box<dyn Error>> {
    let mut builder = ConfigBuilder::new(config_entries());
    if let Some(contents) = fs
        .read_optional(DEFAULT_TOML_PATH)
        .map_err(|e| format!("failed to read {}: {}", DEFAULT_TOML_PATH, e))?
    {
        load_toml(DEFAULT_TOML_PATH, &contents, &mut builder)?;
    }
    parse_args(&mut builder, &args)?;
    let mut conf = MasterConfig::default();
    builder.apply_to(&mut conf)?;
    Ok(conf)
}

/// Usage text listing every option with its default
pub fn config_help() -> String {
    let builder = ConfigBuilder::new(config_entries());
    let mut help = format!(
        "Usage: tickcast [--option-name [value]]...\nOptions can also be set in {}\n\n",
        DEFAULT_TOML_PATH
    );
    for entry in builder.entries() {
        help.push_str(&format!(
            "--{} ({}, default {})\n  {}\n",
            entry.name().replace('_', "-"),
            entry.value().type_name(),
            entry.value(),
            entry.help()
        ));
    }
    help
}
