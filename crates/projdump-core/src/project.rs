//! Read-only context describing the project being exported.

/// Branch flavour as stored in `project_branches.branch_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchType {
    Main,
    Branch,
    PullRequest,
}

impl BranchType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MAIN" => Some(BranchType::Main),
            "BRANCH" => Some(BranchType::Branch),
            "PULL_REQUEST" => Some(BranchType::PullRequest),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            BranchType::Main => "MAIN",
            BranchType::Branch => "BRANCH",
            BranchType::PullRequest => "PULL_REQUEST",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub uuid: String,
    pub key: String,
    pub branch_type: BranchType,
    pub merge_branch_uuid: Option<String>,
    /// Long-lived branches survive housekeeping and keep their new code
    /// period override in the dump.
    pub excluded_from_purge: bool,
}

/// Identity and branches of the project targeted by one export run.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectHolder {
    uuid: String,
    key: String,
    name: String,
    branches: Vec<Branch>,
}

impl ProjectHolder {
    pub fn new(
        uuid: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        branches: Vec<Branch>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            key: key.into(),
            name: name.into(),
            branches,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch(&self, uuid: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.uuid == uuid)
    }

    pub fn branch_uuids(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().map(|b| b.uuid.as_str())
    }
}
