//! Stage context for stage-sensitive secret names

use crate::value::Value;

/// The resolved value of the stage parameter, once known
///
/// The engine resolves the stage parameter before anything else and records
/// it here, so later stage-sensitive secrets can build `{name}_{stage}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageContext {
    stage: Option<String>,
}

impl StageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the resolved stage value; an empty value leaves the stage unknown
    pub fn record(&mut self, value: &Value) {
        let stage = value.to_string();
        self.stage = if stage.is_empty() { None } else { Some(stage) };
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    /// `{name}_{stage}`, or `None` while no stage is known
    pub fn qualified_name(&self, name: &str) -> Option<String> {
        self.stage.as_ref().map(|stage| format!("{}_{}", name, stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        let mut ctx = StageContext::new();
        assert_eq!(ctx.qualified_name("TOKEN"), None);

        ctx.record(&Value::String("prod".into()));
        assert_eq!(ctx.stage(), Some("prod"));
        assert_eq!(ctx.qualified_name("TOKEN"), Some("TOKEN_prod".to_string()));
    }

    #[test]
    fn test_empty_stage_is_unknown() {
        let mut ctx = StageContext::new();
        ctx.record(&Value::String(String::new()));
        assert_eq!(ctx.stage(), None);
        assert_eq!(ctx.qualified_name("TOKEN"), None);
    }

    #[test]
    fn test_non_string_stage() {
        let mut ctx = StageContext::new();
        ctx.record(&Value::Int(2));
        assert_eq!(ctx.qualified_name("TOKEN"), Some("TOKEN_2".to_string()));
    }
}
