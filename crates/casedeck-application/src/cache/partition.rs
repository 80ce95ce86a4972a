use std::fmt;

/// An independently invalidated slice of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CachePartition {
    /// The global session list.
    Sessions,
    /// The test cases of one session.
    TestCases(String),
    /// The AI configuration list.
    AiConfigurations,
}

impl fmt::Display for CachePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePartition::Sessions => write!(f, "sessions"),
            CachePartition::TestCases(session_id) => write!(f, "test-cases/{session_id}"),
            CachePartition::AiConfigurations => write!(f, "ai-configurations"),
        }
    }
}

/// Kind of a write, without its target. Busy guards are keyed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    CreateSession,
    RenameSession,
    DeleteSession,
    CreateTestCase,
    UpdateTestCase,
    DeleteTestCase,
    CreateAiConfiguration,
    UploadDocument,
    AnalyzeDocument,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::CreateSession => "create session",
            MutationKind::RenameSession => "rename session",
            MutationKind::DeleteSession => "delete session",
            MutationKind::CreateTestCase => "create test case",
            MutationKind::UpdateTestCase => "update test case",
            MutationKind::DeleteTestCase => "delete test case",
            MutationKind::CreateAiConfiguration => "save AI configuration",
            MutationKind::UploadDocument => "upload document",
            MutationKind::AnalyzeDocument => "analyze document",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every write the state layer can issue against the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateSession,
    RenameSession { session_id: String },
    DeleteSession { session_id: String },
    CreateTestCase { session_id: String },
    UpdateTestCase { session_id: String },
    DeleteTestCase { session_id: String },
    CreateAiConfiguration,
    /// The server retitles the session after the uploaded file.
    UploadDocument { session_id: String },
    /// The server generates test cases into the session.
    AnalyzeDocument { session_id: String },
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateSession => MutationKind::CreateSession,
            Mutation::RenameSession { .. } => MutationKind::RenameSession,
            Mutation::DeleteSession { .. } => MutationKind::DeleteSession,
            Mutation::CreateTestCase { .. } => MutationKind::CreateTestCase,
            Mutation::UpdateTestCase { .. } => MutationKind::UpdateTestCase,
            Mutation::DeleteTestCase { .. } => MutationKind::DeleteTestCase,
            Mutation::CreateAiConfiguration => MutationKind::CreateAiConfiguration,
            Mutation::UploadDocument { .. } => MutationKind::UploadDocument,
            Mutation::AnalyzeDocument { .. } => MutationKind::AnalyzeDocument,
        }
    }

    /// Partitions that may have changed once this mutation succeeded.
    pub fn invalidates(&self) -> Vec<CachePartition> {
        match self {
            Mutation::CreateSession | Mutation::RenameSession { .. } => {
                vec![CachePartition::Sessions]
            }
            Mutation::DeleteSession { session_id } => vec![
                CachePartition::Sessions,
                CachePartition::TestCases(session_id.clone()),
            ],
            Mutation::CreateTestCase { session_id }
            | Mutation::UpdateTestCase { session_id }
            | Mutation::DeleteTestCase { session_id }
            | Mutation::AnalyzeDocument { session_id } => {
                vec![CachePartition::TestCases(session_id.clone())]
            }
            Mutation::CreateAiConfiguration => vec![CachePartition::AiConfigurations],
            Mutation::UploadDocument { .. } => vec![CachePartition::Sessions],
        }
    }

    /// Invalidated partitions whose owner no longer exists; they are dropped
    /// instead of re-fetched.
    pub fn evicts(&self) -> Vec<CachePartition> {
        match self {
            Mutation::DeleteSession { session_id } => {
                vec![CachePartition::TestCases(session_id.clone())]
            }
            _ => Vec::new(),
        }
    }

    /// Message shown once the mutation succeeded.
    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::CreateSession => "Session created",
            Mutation::RenameSession { .. } => "Session renamed",
            Mutation::DeleteSession { .. } => "Session deleted",
            Mutation::CreateTestCase { .. } => "Test case created",
            Mutation::UpdateTestCase { .. } => "Test case updated",
            Mutation::DeleteTestCase { .. } => "Test case deleted",
            Mutation::CreateAiConfiguration => "AI configuration saved",
            Mutation::UploadDocument { .. } => "Document uploaded",
            Mutation::AnalyzeDocument { .. } => "Analysis complete",
        }
    }
}
