//! Command-line surface backed by clap

use clap::parser::ValueSource;
use clap::{Arg, ArgMatches, Command};

use super::ArgumentSource;
use crate::registry::ParameterRegistry;
use crate::value::TypeTag;

/// Add one `--NAME <VALUE>` argument per registered parameter to `command`
///
/// Arguments are named exactly like their parameters. No clap defaults are
/// set, so only values typed on the command line are ever reported as
/// explicit. Bool parameters also accept a bare `--NAME` (meaning `true`) and
/// `--NAME=false`.
pub fn command_for(registry: &ParameterRegistry, mut command: Command) -> Command {
    for descriptor in registry.descriptors() {
        let mut help = descriptor.usage.clone();
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&format!("(default {})", descriptor.default_value));
        if descriptor.required {
            help.push_str(" [required]");
        }

        let arg = Arg::new(descriptor.name.clone())
            .long(descriptor.name.clone())
            .help(help)
            .required(false);

        let arg = match descriptor.declared_type() {
            TypeTag::Bool => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_name("BOOL"),
            tag => arg.num_args(1).value_name(tag.as_str().to_uppercase()),
        };
        command = command.arg(arg);
    }
    command
}

/// Argument source over parsed clap matches
#[derive(Debug, Clone)]
pub struct ClapArguments {
    matches: ArgMatches,
}

impl ClapArguments {
    pub fn new(matches: ArgMatches) -> Self {
        Self { matches }
    }
}

impl ArgumentSource for ClapArguments {
    fn explicit_value(&self, name: &str) -> Option<String> {
        // Unknown ids are an error in clap; treat them as not supplied
        if !matches!(self.matches.try_contains_id(name), Ok(true)) {
            return None;
        }
        if self.matches.value_source(name) != Some(ValueSource::CommandLine) {
            return None;
        }
        self.matches.try_get_one::<String>(name).ok().flatten().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParameterOptions;

    fn registry() -> ParameterRegistry {
        let mut registry = ParameterRegistry::new();
        registry.add_string("HOST", "", "Database host", true, ParameterOptions::default());
        registry.add_int("PORT", 5432, "Database port", false, ParameterOptions::default());
        registry.add_bool("LOCAL", false, "Run locally", false, ParameterOptions::default());
        registry
    }

    fn parse(args: &[&str]) -> ClapArguments {
        let command = command_for(&registry(), Command::new("svc"));
        ClapArguments::new(command.try_get_matches_from(args).unwrap())
    }

    #[test]
    fn test_explicit_values() {
        let args = parse(&["svc", "--HOST", "db.example.com", "--PORT=6543"]);
        assert_eq!(args.explicit_value("HOST"), Some("db.example.com".to_string()));
        assert_eq!(args.explicit_value("PORT"), Some("6543".to_string()));
        assert_eq!(args.explicit_value("LOCAL"), None);
    }

    #[test]
    fn test_bare_bool_flag_means_true() {
        let args = parse(&["svc", "--LOCAL"]);
        assert_eq!(args.explicit_value("LOCAL"), Some("true".to_string()));

        let args = parse(&["svc", "--LOCAL=false"]);
        assert_eq!(args.explicit_value("LOCAL"), Some("false".to_string()));
    }

    #[test]
    fn test_unknown_name_is_not_supplied() {
        let args = parse(&["svc"]);
        assert_eq!(args.explicit_value("NOT_REGISTERED"), None);
    }

    #[test]
    fn test_unregistered_flag_is_rejected() {
        let command = command_for(&registry(), Command::new("svc"));
        assert!(command.try_get_matches_from(["svc", "--OTHER", "x"]).is_err());
    }
}
