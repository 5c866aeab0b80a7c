use std::io::Write;

use mockall::automock;

#[automock]
pub trait ParameterEcho: Send + Sync {
    fn echo(&self, parameters: &[String]) -> std::io::Result<()>;
}

/// One stdout line per echo, in the bracketed list form `[a, b]`.
pub struct StdoutEcho;

pub fn format_line(parameters: &[String]) -> String {
    format!("[{}]", parameters.join(", "))
}

impl ParameterEcho for StdoutEcho {
    fn echo(&self, parameters: &[String]) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", format_line(parameters))?;
        out.flush()
    }
}
