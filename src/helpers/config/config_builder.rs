use super::*;

/// A value for a configuration entry, from any source
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Parses text into a value of the same type as self
    pub fn parse_like(&self, text: &str) -> Option<Self> {
        match self {
            Self::Bool(_) => match text {
                "true" => Some(Self::Bool(true)),
                "false" => Some(Self::Bool(false)),
                _ => None,
            },
            Self::Int(_) => text.parse().ok().map(Self::Int),
            Self::Float(_) => text.parse().ok().map(Self::Float),
            Self::String(_) => Some(Self::String(text.to_string())),
        }
    }

    /// Returns the value as the same type as self, if it can be. Ints are accepted for floats.
    fn coerce_like(&self, value: Self) -> Option<Self> {
        match (self, value) {
            (Self::Float(_), Self::Int(i)) => Some(Self::Float(i as f64)),
            (Self::Bool(_), v @ Self::Bool(_))
            | (Self::Int(_), v @ Self::Int(_))
            | (Self::Float(_), v @ Self::Float(_))
            | (Self::String(_), v @ Self::String(_)) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
        }
    }
}

/// Applies an entry's value to the config. The source is Some if the value is not the default,
/// and describes where it came from (for error messages).
type ApplyFn = Box<dyn Fn(&mut MasterConfig, &ConfigValue, Option<&str>) -> Result<(), Box<dyn Error>>>;

pub struct ConfigEntryVariant {
    pub name: String,
    pub help: String,
    pub apply_fn: Box<dyn Fn(&mut MasterConfig)>,
}

/// A single named configuration option, its current value and how to apply it
pub struct ConfigEntry {
    name: String,
    help: String,
    value: ConfigValue,
    /// Some if the value is not default, describes how it was set
    source: Option<String>,
    apply_fn: ApplyFn,
}

impl ConfigEntry {
    fn new<T, E, F>(name: &str, help: &str, default: ConfigValue, extract: E, apply: F) -> Self
    where
        E: Fn(&ConfigValue) -> Option<T> + 'static,
        F: Fn(&mut MasterConfig, T, Option<&str>) -> Result<(), Box<dyn Error>> + 'static,
    {
        let entry_name = name.to_string();
        Self {
            name: name.to_string(),
            help: help.to_string(),
            value: default,
            source: None,
            apply_fn: Box::new(move |conf, value, source| match extract(value) {
                Some(value) => apply(conf, value, source),
                None => Err(format!("{} holds a {} value", entry_name, value.type_name()).into()),
            }),
        }
    }

    pub fn new_bool<F>(name: &str, help: &str, default: bool, apply: F) -> Self
    where
        F: Fn(&mut MasterConfig, bool, Option<&str>) -> Result<(), Box<dyn Error>> + 'static,
    {
        let extract = |v: &ConfigValue| match v {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        };
        Self::new(name, help, ConfigValue::Bool(default), extract, apply)
    }

    pub fn new_int<F>(name: &str, help: &str, default: i64, apply: F) -> Self
    where
        F: Fn(&mut MasterConfig, i64, Option<&str>) -> Result<(), Box<dyn Error>> + 'static,
    {
        let extract = |v: &ConfigValue| match v {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        };
        Self::new(name, help, ConfigValue::Int(default), extract, apply)
    }

    pub fn new_float<F>(name: &str, help: &str, default: f64, apply: F) -> Self
    where
        F: Fn(&mut MasterConfig, f64, Option<&str>) -> Result<(), Box<dyn Error>> + 'static,
    {
        let extract = |v: &ConfigValue| match v {
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        };
        Self::new(name, help, ConfigValue::Float(default), extract, apply)
    }

    pub fn new_string<F>(name: &str, help: &str, default: &str, apply: F) -> Self
    where
        F: Fn(&mut MasterConfig, String, Option<&str>) -> Result<(), Box<dyn Error>> + 'static,
    {
        let extract = |v: &ConfigValue| match v {
            ConfigValue::String(s) => Some(s.clone()),
            _ => None,
        };
        Self::new(name, help, ConfigValue::String(default.to_string()), extract, apply)
    }

    /// A string entry that must be one of the given variants. The first variant is the default.
    pub fn new_enum(name: &str, help: &str, variants: Vec<ConfigEntryVariant>) -> Self {
        assert!(!variants.is_empty());
        let mut help = help.to_string();
        for variant in &variants {
            help.push_str(&format!("\n    {}: {}", variant.name, variant.help))
        }
        let default = variants[0].name.clone();
        Self::new_string(name, &help, &default, move |conf, value, source| {
            match variants.iter().find(|v| v.name == value) {
                Some(variant) => {
                    (variant.apply_fn)(conf);
                    Ok(())
                }
                None => Err(format!(
                    "{} has invalid value {}, valid options are {}",
                    source.unwrap_or("default value"),
                    value,
                    variants
                        .iter()
                        .map(|v| v.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                )
                .into()),
            }
        })
    }

    pub fn new_enum_variant<F: Fn(&mut MasterConfig) + 'static>(
        name: &str,
        help: &str,
        apply: F,
    ) -> ConfigEntryVariant {
        ConfigEntryVariant {
            name: name.to_string(),
            help: help.to_string(),
            apply_fn: Box::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// The current value, which is also the type the entry expects
    pub fn value(&self) -> &ConfigValue {
        &self.value
    }

    pub fn set(&mut self, value: ConfigValue, source: String) -> Result<(), Box<dyn Error>> {
        match self.value.coerce_like(value.clone()) {
            Some(value) => {
                self.value = value;
                self.source = Some(source);
                Ok(())
            }
            None => Err(format!(
                "{} is not valid for {} (expected: {})",
                value,
                self.name,
                self.value.type_name()
            )
            .into()),
        }
    }

    fn apply_to(&self, target: &mut MasterConfig) -> Result<(), Box<dyn Error>> {
        (self.apply_fn)(target, &self.value, self.source.as_deref())
    }
}

pub struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

impl ConfigBuilder {
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        let mut names = HashSet::new();
        for entry in &entries {
            if !names.insert(entry.name()) {
                panic!("duplicate configuration entry {}", entry.name());
            }
        }
        Self { entries }
    }

    pub fn entry(&mut self, name: &str) -> Option<&mut ConfigEntry> {
        self.entries.iter_mut().find(|entry| entry.name() == name)
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Applies every entry in order, whether or not it was set
    pub fn apply_to(&self, target: &mut MasterConfig) -> Result<(), Box<dyn Error>> {
        for entry in &self.entries {
            entry
                .apply_to(target)
                .map_err(|e| format!("{} configuration option: {}", entry.name(), e))?;
        }
        Ok(())
    }
}
