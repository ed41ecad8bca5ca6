use std::collections::HashMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Payload,
    PayloadKind,
    RendererUrl,
    Title,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::Payload,
        Placeholder::PayloadKind,
        Placeholder::RendererUrl,
        Placeholder::Title,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Payload => "PAYLOAD",
            Placeholder::PayloadKind => "PAYLOAD_KIND",
            Placeholder::RendererUrl => "RENDERER_URL",
            Placeholder::Title => "TITLE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

pub type TemplateValues = HashMap<Placeholder, String>;

/// Substitute `{{NAME}}` tokens in a single pass.
///
/// Substituted values are never re-scanned. Tokens naming an unknown key, or a
/// key absent from `values`, are copied through untouched.
pub fn render(template: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = after_open[..end].trim();
        match Placeholder::from_name(name).and_then(|p| values.get(&p)) {
            Some(value) => {
                out.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Keep the opening braces and resume right after them so a
                // nested `{{{{KEY}}` still gets a chance to match.
                out.push_str(OPEN);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(Placeholder, &str)]) -> TemplateValues {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_substitutes_all_keys() {
        let v = values(&[
            (Placeholder::Payload, "QUJD"),
            (Placeholder::PayloadKind, "json"),
            (Placeholder::RendererUrl, "https://x/y.js"),
            (Placeholder::Title, "anim.json"),
        ]);
        let out = render(
            "{{TITLE}}|{{RENDERER_URL}}|{{PAYLOAD_KIND}}|{{PAYLOAD}}",
            &v,
        );
        assert_eq!(out, "anim.json|https://x/y.js|json|QUJD");
    }

    #[test]
    fn test_repeated_token() {
        let v = values(&[(Placeholder::Payload, "A")]);
        assert_eq!(render("{{PAYLOAD}}-{{PAYLOAD}}", &v), "A-A");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let v = values(&[(Placeholder::Title, "t")]);
        assert_eq!(render("<{{ TITLE }}>", &v), "<t>");
    }

    #[test]
    fn test_unknown_token_kept() {
        let v = values(&[(Placeholder::Title, "t")]);
        assert_eq!(render("{{NOPE}} {{TITLE}}", &v), "{{NOPE}} t");
    }

    #[test]
    fn test_missing_value_kept() {
        assert_eq!(render("a{{PAYLOAD}}b", &TemplateValues::new()), "a{{PAYLOAD}}b");
    }

    #[test]
    fn test_values_not_rescanned() {
        let v = values(&[
            (Placeholder::Title, "{{PAYLOAD}}"),
            (Placeholder::Payload, "leak"),
        ]);
        assert_eq!(render("{{TITLE}}", &v), "{{PAYLOAD}}");
    }

    #[test]
    fn test_unterminated_token() {
        let v = values(&[(Placeholder::Title, "t")]);
        assert_eq!(render("x {{TITLE", &v), "x {{TITLE");
    }

    #[test]
    fn test_extra_braces() {
        let v = values(&[(Placeholder::Title, "t")]);
        assert_eq!(render("{{{{TITLE}}", &v), "{{t");
    }

    #[test]
    fn test_no_tokens() {
        assert_eq!(render("plain { text }", &TemplateValues::new()), "plain { text }");
    }

    #[test]
    fn test_names_round_trip() {
        for p in Placeholder::ALL {
            assert_eq!(Placeholder::from_name(p.name()), Some(p));
        }
        assert_eq!(Placeholder::from_name("payload"), None);
    }
}
