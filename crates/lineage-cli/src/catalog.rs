//! Loading of the TOML type catalog.

use std::{fs, path::Path};

use log::info;

use lineage::TypeCatalog;

use crate::error::CliError;

/// Reads and parses the type catalog at `path`.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the file cannot be read and
/// [`CliError::Toml`] if it does not describe a catalog.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<TypeCatalog, CliError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| CliError::io(path, err))?;

    let catalog: TypeCatalog = match toml::from_str(&content) {
        Ok(catalog) => catalog,
        Err(err) => {
            return Err(CliError::toml(
                "catalog",
                path,
                content,
                &err,
                Some("each [[types]] entry needs at least a qualified `name`".to_string()),
            ));
        }
    };

    info!(
        path = path.display().to_string(),
        types = catalog.len();
        "Type catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use lineage::identifier::TypeId;

    use super::*;

    #[test]
    fn test_load_catalog() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(
            file,
            r#"
            [[types]]
            name = "java.lang.Object"
            included = false

            [[types]]
            name = "geo.Shape"
            superclass = "java.lang.Object"
            "#
        )
        .expect("Failed to write temp file");

        let catalog = load_catalog(file.path()).expect("catalog should load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.included().collect::<Vec<_>>(),
            vec![TypeId::new("geo.Shape")]
        );
    }

    #[test]
    fn test_missing_catalog() {
        let err = load_catalog("/nonexistent/types.toml").unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
