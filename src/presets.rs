use crate::cli::Preset;
use crate::config::{ReplaceConfig, RuleSpec};
use crate::multi::Strategy;

/// Loads a pre-defined `ReplaceConfig` for a given `Preset`.
///
/// Presets are built-in literal rule sets for common text cleanups. Each one
/// carries the strategy it was written for.
pub fn load(preset: &Preset) -> ReplaceConfig {
    let rules = match preset {
        Preset::TabsToSpaces => vec![RuleSpec::new("\t", "    ")],

        Preset::SpacesToTabs => vec![RuleSpec::new("    ", "\t")],

        Preset::CrlfToLf => vec![RuleSpec::new("\r\n", "\n")],

        Preset::AsciiQuotes => vec![
            RuleSpec::new("\u{2018}", "'"),
            RuleSpec::new("\u{2019}", "'"),
            RuleSpec::new("\u{201c}", "\""),
            RuleSpec::new("\u{201d}", "\""),
            RuleSpec::new("\u{2026}", "..."),
        ],

        // Single pass, so the `&` introduced by `&lt;` is never escaped again.
        Preset::HtmlEscape => vec![
            RuleSpec::new("&", "&amp;"),
            RuleSpec::new("<", "&lt;"),
            RuleSpec::new(">", "&gt;"),
        ],
    };

    ReplaceConfig {
        strategy: Strategy::SinglePass,
        rules,
        ..ReplaceConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi::{Rule, apply};

    fn run(preset: Preset, text: &str) -> Vec<u8> {
        let config = load(&preset);
        let rules: Vec<Rule<'_>> = config.rules.iter().map(RuleSpec::as_rule).collect();
        apply(text.as_bytes(), &rules, config.strategy).unwrap()
    }

    #[test]
    fn test_html_escape_does_not_double_escape() {
        assert_eq!(run(Preset::HtmlEscape, "a < b && c > d"), b"a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_ascii_quotes() {
        assert_eq!(
            run(Preset::AsciiQuotes, "\u{201c}It\u{2019}s fine\u{2026}\u{201d}"),
            b"\"It's fine...\""
        );
    }

    #[test]
    fn test_whitespace_presets() {
        assert_eq!(run(Preset::TabsToSpaces, "\tx\t"), b"    x    ");
        assert_eq!(run(Preset::SpacesToTabs, "        x"), b"\t\tx");
        assert_eq!(run(Preset::CrlfToLf, "a\r\nb\r\n"), b"a\nb\n");
    }

    #[test]
    fn test_presets_validate() {
        for preset in [
            Preset::TabsToSpaces,
            Preset::SpacesToTabs,
            Preset::CrlfToLf,
            Preset::AsciiQuotes,
            Preset::HtmlEscape,
        ] {
            assert!(load(&preset).validate().is_ok());
        }
    }
}
