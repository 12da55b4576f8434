use colored::*;
use conduit_core::{
    catalog::ProcedureInfo,
    client::InitError,
    config::ConfigError,
    encoding::EncodeError,
    error::CallError,
    whoami::Identity,
};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct ProcedureList<'a>(pub Vec<&'a ProcedureInfo>);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<InitError> for FormattedString {
    fn from(err: InitError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Connection Error:".red().bold(), err))
    }
}

impl From<ConfigError> for FormattedString {
    fn from(err: ConfigError) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Invalid Configuration:".red().bold(),
            err
        ))
    }
}

impl From<EncodeError> for FormattedString {
    fn from(err: EncodeError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Invalid Arguments:".red().bold(), err))
    }
}

impl From<CallError> for FormattedString {
    fn from(err: CallError) -> Self {
        let title = match &err {
            CallError::UnknownProcedure { .. } => "Procedure Lookup Failed:",
            CallError::Remote(_) => "Conduit Error:",
            CallError::Cancelled => "Cancelled:",
            _ => "Call Failed:",
        };
        FormattedString(format!("{}\n\n'{}'", title.red().bold(), err))
    }
}

impl From<ProcedureList<'_>> for FormattedString {
    fn from(ProcedureList(procedures): ProcedureList<'_>) -> Self {
        if procedures.is_empty() {
            return FormattedString("No procedures found.".yellow().to_string());
        }

        let mut out = String::new();
        out.push_str("Available Procedures:\n");
        for info in procedures {
            out.push_str(&format!(
                "  - {} {}\n",
                info.name.green(),
                format!("({})", info.kind()).dimmed()
            ));
        }
        FormattedString(out.trim_end().to_string())
    }
}

impl From<&ProcedureInfo> for FormattedString {
    fn from(info: &ProcedureInfo) -> Self {
        let mut out = String::new();
        out.push_str(&format!(
            "{} {} {}\n",
            "procedure".cyan(),
            info.name.green(),
            format!("({})", info.kind()).dimmed()
        ));
        out.push_str(&format!("  {}\n", info.description));

        if info.params.is_empty() {
            out.push_str(&format!("  {}\n", "No parameters.".yellow()));
        } else {
            out.push_str(&format!("  {}\n", "Parameters:".bold()));
            for (param, desc) in &info.params {
                out.push_str(&format!("    {}: {}\n", param.blue(), desc.dimmed()));
            }
        }

        out.push_str(&format!("  {} {}", "Returns:".bold(), info.returns.cyan()));
        FormattedString(out)
    }
}

impl From<Identity> for FormattedString {
    fn from(identity: Identity) -> Self {
        let mut out = String::new();
        out.push_str(&format!(
            "{} ({})\n",
            identity.user_name.green().bold(),
            identity.real_name
        ));
        out.push_str(&format!("  {} {}\n", "PHID:".bold(), identity.phid));
        out.push_str(&format!("  {} {}\n", "Email:".bold(), identity.primary_email));
        out.push_str(&format!("  {} {}\n", "Profile:".bold(), identity.uri));
        out.push_str(&format!("  {} {}", "Roles:".bold(), identity.roles.join(", ")));
        FormattedString(out)
    }
}
