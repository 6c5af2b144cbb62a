use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) output_dir: Arc<PathBuf>,
}

/// Resolves a download name inside the output directory. Anything other than a
/// single plain file name is refused.
pub(crate) fn output_file(output_dir: &Path, filename: &str) -> Option<PathBuf> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if !filename.contains('\\') => {
            Some(output_dir.join(name))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_file_accepts_plain_names_only() {
        let dir = Path::new("output");
        assert_eq!(
            output_file(dir, "wohngeldantrag_beispiel_20251221_101500.json"),
            Some(dir.join("wohngeldantrag_beispiel_20251221_101500.json"))
        );
        for rejected in ["", "..", "../secret.json", "/etc/passwd", "a/b.json", "..\\x.json"] {
            assert_eq!(output_file(dir, rejected), None, "{rejected}");
        }
    }
}
