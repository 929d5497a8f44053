use std::io::ErrorKind;
use std::path::PathBuf;

/// Free-text notes appended to homework answers.
pub trait KnowledgeBase: Send + Sync {
    fn lookup(&self, topic: &str) -> Option<String>;
}

/// Reads `<root>/<topic>.txt`.
#[derive(Debug, Clone)]
pub struct DirKnowledgeBase {
    root: PathBuf,
}

impl DirKnowledgeBase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl KnowledgeBase for DirKnowledgeBase {
    fn lookup(&self, topic: &str) -> Option<String> {
        let path = self.root.join(format!("{topic}.txt"));
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let content = content.trim();
                (!content.is_empty()).then(|| content.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable knowledge file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_trimmed_topic_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("math.txt"), "\n  Remember BODMAS.  \n").unwrap();
        std::fs::write(dir.path().join("physics.txt"), "   ").unwrap();

        let kb = DirKnowledgeBase::new(dir.path());
        assert_eq!(kb.lookup("math").as_deref(), Some("Remember BODMAS."));
        assert_eq!(kb.lookup("physics"), None);
        assert_eq!(kb.lookup("programming"), None);
    }
}
