use super::*;

pub const DEFAULT_TOML_PATH: &str = "tickcast.toml";

fn to_config_value(value: toml::Value) -> Result<ConfigValue, toml::Value> {
    match value {
        toml::Value::Boolean(v) => Ok(ConfigValue::Bool(v)),
        toml::Value::Integer(v) => Ok(ConfigValue::Int(v)),
        toml::Value::Float(v) => Ok(ConfigValue::Float(v)),
        toml::Value::String(v) => Ok(ConfigValue::String(v)),
        other => Err(other),
    }
}

fn try_set(
    builder: &mut ConfigBuilder,
    file: &str,
    name: &str,
    value: toml::Value,
) -> Result<(), Box<dyn Error>> {
    let entry = builder
        .entry(name)
        .ok_or_else(|| format!("{} is not a valid option", name))?;
    match to_config_value(value) {
        Ok(value) => entry.set(value, format!("{} in {}", name, file)),
        Err(value) => Err(format!(
            "{} is not valid for {} (expected: {})",
            value,
            name,
            entry.value().type_name()
        )
        .into()),
    }
}

/// Sets every entry named in the TOML document. path is only used for messages.
pub fn load_toml(
    path: &str,
    contents: &str,
    builder: &mut ConfigBuilder,
) -> Result<(), Box<dyn Error>> {
    let parsed = contents
        .parse::<toml::Value>()
        .map_err(|e| format!("{}: {}", path, e))?;
    match parsed {
        toml::Value::Table(table) => {
            for (name, value) in table {
                try_set(builder, path, &name, value).map_err(|e| format!("{}: {}", path, e))?;
            }
            Ok(())
        }
        _ => Err(format!("toplevel value of {} is not a table", path).into()),
    }
}
