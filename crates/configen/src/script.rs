//! Assembling the generated script.

use std::io::{self, Write};

/// Appends generated fragments to one output artifact.
///
/// One writer exists per document, owning the output handle for exactly the
/// document's processing scope; the orchestrator drops it before recursing
/// into subconfigurations.
pub struct ScriptWriter<W: Write> {
    out: W,
}

impl<W: Write> ScriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Section banner, e.g. `#### Inputs`.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        write!(self.out, "\n\n#### {title}\n\n")
    }

    /// Append raw text.
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Consume the writer, returning the underlying handle (tests).
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render one indented `LABEL value` argument line, or nothing for an empty
/// value. Quoted values get embedded double quotes escaped.
pub fn lineify(label: &str, value: &str, quote: bool) -> String {
    if value.is_empty() {
        return String::new();
    }
    if quote {
        format!("    {} \"{}\"\n", label, value.replace('"', "\\\""))
    } else {
        format!("    {label} {value}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lineify_skips_empty_values() {
        assert_eq!(lineify("LABEL", "", true), "");
    }

    #[test]
    fn lineify_quotes_and_escapes() {
        assert_eq!(
            lineify("LABEL", "C++11 \"future\"", true),
            "    LABEL \"C++11 \\\"future\\\"\"\n"
        );
    }

    #[test]
    fn lineify_unquoted_passes_through() {
        assert_eq!(lineify("CONDITION", "WIN32 AND ON", false), "    CONDITION WIN32 AND ON\n");
    }

    #[test]
    fn sections_are_banners() {
        let mut writer = ScriptWriter::new(Vec::new());
        writer.section("Inputs").unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "\n\n#### Inputs\n\n");
    }
}
