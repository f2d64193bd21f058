use super::*;

/// An in-memory filesystem, clones share the same files
#[derive(Debug, Clone)]
pub struct MockFilesystem(Arc<Mutex<HashMap<String, String>>>);

impl MockFilesystem {
    pub fn new() -> Self {
        MockFilesystem(Arc::new(Mutex::new(HashMap::new())))
    }

    pub fn add_file(self, path: &str, contents: &str) -> Self {
        self.0
            .lock()
            .unwrap()
            .insert(path.to_string(), contents.to_string());
        self
    }

    pub fn boxed(&self) -> Filesystem {
        Box::new(self.clone())
    }
}

impl FilesystemTrait for MockFilesystem {
    fn read_optional(&self, path: &str) -> std::io::Result<Option<String>> {
        Ok(self.0.lock().unwrap().get(path).cloned())
    }
}
