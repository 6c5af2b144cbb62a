/// Keyword predicate over a normalized field name.
///
/// A name matches when it contains at least one `any` keyword (or `any` is
/// empty), every `all` keyword, no `none` keyword, and ends with one of the
/// `suffix` keywords when suffixes are given.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pattern {
    any: &'static [&'static str],
    all: &'static [&'static str],
    none: &'static [&'static str],
    suffix: &'static [&'static str],
}

impl Pattern {
    pub(crate) const fn any(keywords: &'static [&'static str]) -> Self {
        Self {
            any: keywords,
            all: &[],
            none: &[],
            suffix: &[],
        }
    }

    pub(crate) const fn ending(suffixes: &'static [&'static str]) -> Self {
        Self {
            any: &[],
            all: &[],
            none: &[],
            suffix: suffixes,
        }
    }

    pub(crate) const fn and(self, keywords: &'static [&'static str]) -> Self {
        Self {
            all: keywords,
            ..self
        }
    }

    pub(crate) const fn but_not(self, keywords: &'static [&'static str]) -> Self {
        Self {
            none: keywords,
            ..self
        }
    }

    pub(crate) fn matches(&self, normalized: &str) -> bool {
        (self.any.is_empty() || self.any.iter().any(|kw| normalized.contains(kw)))
            && self.all.iter().all(|kw| normalized.contains(kw))
            && !self.none.iter().any(|kw| normalized.contains(kw))
            && (self.suffix.is_empty() || self.suffix.iter().any(|kw| normalized.ends_with(kw)))
    }

    pub(crate) fn keywords(&self) -> impl Iterator<Item = &'static str> {
        self.any
            .iter()
            .chain(self.all)
            .chain(self.none)
            .chain(self.suffix)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_any_all_none_and_suffix() {
        let married = Pattern::any(&["verheiratet"]).but_not(&["nicht"]);
        assert!(married.matches("persangfamstandverheiratet"));
        assert!(!married.matches("nichtverheiratet"));

        let yes = Pattern::any(&["zweitwohnsitz"]).and(&["wohnung"]);
        assert!(yes.matches("wohnungzweitwohnsitzja"));
        assert!(!yes.matches("zweitwohnsitzja"));

        assert!(Pattern::ending(&["ja"]).matches("freibwerbja"));
        assert!(!Pattern::ending(&["ja"]).matches("heizkostemjagesond"));
    }
}
