//! Usage text for a manifest

use paramstack_core::config::ParameterManifest;
use paramstack_core::{ParameterDescriptor, Value};

/// Render the usage text of an application
///
/// `parameters` is a registry snapshot, so parameters added outside the
/// manifest (such as the secret store region) are listed too. Required
/// parameters are marked with `*`.
pub fn render_usage(manifest: &ParameterManifest, parameters: &[ParameterDescriptor]) -> String {
    let mut out = String::from("Usage:\n");
    out.push_str(&format!("  Application: {}\n", manifest.name));
    out.push_str(&format!("  Description: {}\n", manifest.description));

    if !parameters.is_empty() {
        out.push_str("  Parameters:\n");
        for descriptor in parameters {
            let marker = if descriptor.required { "*" } else { "" };
            out.push_str(&format!(
                "    {}{} <{}>\n",
                descriptor.name,
                marker,
                descriptor.declared_type()
            ));
            out.push_str(&format!(
                "      {}{}{}\n",
                descriptor.usage,
                default_text(descriptor),
                secret_text(descriptor)
            ));
        }
    }

    if !manifest.commands.is_empty() {
        out.push_str("  Commands:\n");
        for command in &manifest.commands {
            out.push_str(&format!("    {}", command.name));
            for argument in &command.arguments {
                out.push_str(&format!(" <{}>", argument));
            }
            out.push('\n');
            out.push_str(&format!("      {}\n", command.description));
        }
    }

    if !manifest.arguments.is_empty() {
        out.push_str("  Arguments:\n");
        let arguments: Vec<String> = manifest.arguments.iter().map(|a| format!("<{}>", a)).collect();
        out.push_str(&format!("    {}\n", arguments.join(" ")));
    }

    out
}

fn default_text(descriptor: &ParameterDescriptor) -> String {
    let separator = if descriptor.usage.is_empty() { "" } else { " " };
    match &descriptor.default_value {
        Value::String(s) if s.is_empty() => String::new(),
        value => format!("{}(default {})", separator, value),
    }
}

fn secret_text(descriptor: &ParameterDescriptor) -> &'static str {
    match (descriptor.options.secrets_enabled, descriptor.options.stage_sensitive) {
        (true, true) => " [secret, per stage]",
        (true, false) => " [secret]",
        _ => "",
    }
}
