//! Configuration for Portal Gate

/// Institution root used when `PORTAL_BASE_PATH` is unset
pub const DEFAULT_BASE_PATH: &str = "institutions/TEST_INSTITUTE_01";

/// Page every denied caller is sent back to
pub const DEFAULT_ENTRY_PAGE: &str = "index.html";

/// Gate configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Document path of the institution all role collections live under
    pub base_path: String,

    /// Redirect target for denied callers
    pub entry_page: String,

    /// Collection holding the admin singleton
    pub settings_collection: String,

    /// Key of the admin singleton inside `settings_collection`
    pub admin_document: String,

    /// Collection of staff records
    pub staff_collection: String,

    /// Collection of student records
    pub students_collection: String,
}

impl GateConfig {
    /// Create config with the portal's standard layout
    ///
    /// # Arguments
    /// * `base_path` - Institution document path. Collections resolved:
    ///   ```text
    ///   base_path/
    ///   ├── settings/adminAuth   (admin singleton)
    ///   ├── staff/               (queried by email + isActive)
    ///   └── students/            (looked up by cached id)
    ///   ```
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            entry_page: DEFAULT_ENTRY_PAGE.to_string(),
            settings_collection: "settings".to_string(),
            admin_document: "adminAuth".to_string(),
            staff_collection: "staff".to_string(),
            students_collection: "students".to_string(),
        }
    }

    /// Read `PORTAL_BASE_PATH` and `PORTAL_ENTRY_PAGE`, falling back to defaults
    pub fn from_env() -> Self {
        let base_path =
            std::env::var("PORTAL_BASE_PATH").unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string());
        let mut config = Self::new(base_path);
        if let Ok(entry) = std::env::var("PORTAL_ENTRY_PAGE") {
            config.entry_page = entry;
        }
        config
    }

    /// Override the redirect target
    pub fn with_entry_page(mut self, page: impl Into<String>) -> Self {
        self.entry_page = page.into();
        self
    }

    /// Override the admin singleton key
    pub fn with_admin_document(mut self, key: impl Into<String>) -> Self {
        self.admin_document = key.into();
        self
    }

    /// Override the staff collection name
    pub fn with_staff_collection(mut self, name: impl Into<String>) -> Self {
        self.staff_collection = name.into();
        self
    }

    /// Override the students collection name
    pub fn with_students_collection(mut self, name: impl Into<String>) -> Self {
        self.students_collection = name.into();
        self
    }

    /// Full path of a collection under the institution root
    pub fn collection_path(&self, name: &str) -> String {
        let base = self.base_path.trim_matches('/');
        if base.is_empty() {
            name.to_string()
        } else {
            format!("{base}/{name}")
        }
    }

    pub fn settings_path(&self) -> String {
        self.collection_path(&self.settings_collection)
    }

    pub fn staff_path(&self) -> String {
        self.collection_path(&self.staff_collection)
    }

    pub fn students_path(&self) -> String {
        self.collection_path(&self.students_collection)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH)
    }
}
