/// A mockable interface to the filesystem
pub trait FilesystemTrait {
    /// Reads the whole file at path. Returns None if there is no regular file there, so callers
    /// can treat optional files without racing a separate existence check.
    fn read_optional(&self, path: &str) -> std::io::Result<Option<String>>;
}

pub type Filesystem = Box<dyn FilesystemTrait>;

pub fn real_filesystem() -> Filesystem {
    Box::new(FilesystemImpl)
}

struct FilesystemImpl;

impl FilesystemTrait for FilesystemImpl {
    fn read_optional(&self, path: &str) -> std::io::Result<Option<String>> {
        if std::path::Path::new(path).is_file() {
            std::fs::read_to_string(path).map(Some)
        } else {
            Ok(None)
        }
    }
}
