use super::*;

/// "--tick-seconds" -> "tick_seconds"
fn transform_arg_name(arg_name: &str) -> String {
    arg_name.trim_start_matches('-').replace('-', "_")
}

fn try_set(
    builder: &mut ConfigBuilder,
    arg_name: &str,
    value_str: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let name = transform_arg_name(arg_name);
    let entry = builder
        .entry(&name)
        .ok_or_else(|| format!("{} is not a valid command line option", arg_name))?;
    let message = format!("{} command line argument", arg_name);
    let value = match (entry.value(), value_str) {
        // A bare flag means true
        (ConfigValue::Bool(_), None) => ConfigValue::Bool(true),
        (expected, Some(value_str)) => expected.parse_like(value_str).ok_or_else(|| {
            format!(
                "{} is not valid for {} (expected: {})",
                value_str,
                arg_name,
                expected.type_name()
            )
        })?,
        (expected, None) => {
            return Err(format!(
                "{} argument is required for {}",
                expected.type_name(),
                arg_name
            )
            .into())
        }
    };
    entry.set(value, message)
}

struct Arg {
    index: usize,
    name: String,
    values: Vec<String>,
}

fn parse_list(args: &[String]) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut parsed: Vec<Arg> = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        if i == 0 {
            // program name
            continue;
        } else if arg.starts_with('-') && arg.parse::<f64>().is_err() {
            parsed.push(Arg {
                index: i,
                name: arg.to_owned(),
                values: Vec::new(),
            });
        } else if let Some(last) = parsed.last_mut() {
            last.values.push(arg.to_owned());
        } else {
            return Err(format!(
                "first command line argument {} is a value not an --option-name",
                arg
            )
            .into());
        }
    }
    Ok(parsed)
}

/// Applies command line arguments of the form `--option-name [value]`. The first argument is the
/// program name and is ignored.
pub fn parse_args(builder: &mut ConfigBuilder, args: &[String]) -> Result<(), Box<dyn Error>> {
    for arg in parse_list(args)? {
        match arg.values.as_slice() {
            [] => try_set(builder, &arg.name, None)?,
            [value] => try_set(builder, &arg.name, Some(value.as_str()))?,
            values => {
                return Err(format!(
                    "command line argument {} ({}) has multiple values: {}",
                    arg.index,
                    arg.name,
                    values.join(" ")
                )
                .into())
            }
        }
    }
    Ok(())
}
