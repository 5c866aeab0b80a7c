use crate::core::echo::ParameterEcho;

pub const DEFAULT_MESSAGE_FRAGMENT: &str = "Cannot load configuration from stream";
pub const DEFAULT_CALLER_FRAGMENT: &str = "config_utils";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuppressionRule {
    message_fragment: String,
    caller_fragment: String,
}

impl SuppressionRule {
    pub fn new(message_fragment: String, caller_fragment: String) -> Self {
        Self {
            message_fragment,
            caller_fragment,
        }
    }

    pub fn message_fragment(&self) -> &str {
        &self.message_fragment
    }

    pub fn caller_fragment(&self) -> &str {
        &self.caller_fragment
    }

    pub fn matches_message(&self, message: &str) -> bool {
        message.contains(&self.message_fragment)
    }

    pub fn matches_caller(&self, origin: &str) -> bool {
        origin.contains(&self.caller_fragment)
    }
}

impl Default for SuppressionRule {
    fn default() -> Self {
        Self::new(
            DEFAULT_MESSAGE_FRAGMENT.to_string(),
            DEFAULT_CALLER_FRAGMENT.to_string(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Forward,
    /// Withheld from the sink; `echo` is set when the caller matched too.
    Suppress { echo: bool },
}

pub struct RecordFilter<E: ParameterEcho> {
    rule: SuppressionRule,
    echo: E,
}

impl<E: ParameterEcho> RecordFilter<E> {
    pub fn new(rule: SuppressionRule, echo: E) -> Self {
        Self { rule, echo }
    }

    pub fn rule(&self) -> &SuppressionRule {
        &self.rule
    }

    /// Pure decision, no side effect. A missing message counts as
    /// non-matching so the logging path never fails on malformed input;
    /// origins are checked in order, stopping at the first hit.
    pub fn evaluate<'a, I>(&self, message: Option<&str>, origins: I) -> Verdict
    where
        I: IntoIterator<Item = &'a str>,
    {
        let matched = match message {
            Some(m) => self.rule.matches_message(m),
            None => false,
        };

        if !matched {
            return Verdict::Forward;
        }

        let echo = origins.into_iter().any(|o| self.rule.matches_caller(o));

        Verdict::Suppress { echo }
    }

    /// Returns `true` when the record should reach the sink. Echoes the
    /// parameters at most once on the suppress path; an echo failure is
    /// swallowed and never changes the decision.
    pub fn should_log<'a, I, P>(&self, message: Option<&str>, origins: I, parameters: P) -> bool
    where
        I: IntoIterator<Item = &'a str>,
        P: FnOnce() -> Vec<String>,
    {
        match self.evaluate(message, origins) {
            Verdict::Forward => true,
            Verdict::Suppress { echo } => {
                if echo {
                    let _ = self.echo.echo(&parameters());
                }
                false
            }
        }
    }
}
