use form_agent::{Document, FormAgent, HolisticAnalysis, QaResult, SummaryResult};
use tokio::sync::RwLock;

/// Shared server state: the agent plus the single-user session.
pub struct AppState {
    pub agent: FormAgent,
    pub session: RwLock<Session>,
}

impl AppState {
    pub fn new(agent: FormAgent) -> Self {
        Self {
            agent,
            session: RwLock::new(Session::default()),
        }
    }
}

/// Everything the user has built up this session: stored documents and the
/// latest result of each operation, kept for the downloadable report.
#[derive(Default)]
pub struct Session {
    pub documents: Vec<Document>,
    pub last_qa: Option<QaResult>,
    pub last_summary: Option<SummaryResult>,
    pub last_holistic: Option<HolisticAnalysis>,
}

impl Session {
    /// Look a document up by id, falling back to the filename so the UI can
    /// use either.
    pub fn find_document(&self, key: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.id == key)
            .or_else(|| self.documents.iter().find(|d| d.name == key))
    }

    /// Store a document, replacing any previous upload with the same name.
    pub fn upsert_document(&mut self, document: Document) {
        if let Some(existing) = self.documents.iter_mut().find(|d| d.name == document.name) {
            *existing = document;
        } else {
            self.documents.push(document);
        }
    }
}
