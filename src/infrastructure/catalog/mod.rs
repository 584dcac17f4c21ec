//! Catalog loading from the metadata file

use std::path::Path;

use tracing::info;

use crate::domain::catalog::CatalogIndex;
use crate::domain::DomainError;

/// Load the tool catalog from a JSON metadata file at startup
pub fn load_catalog(path: &Path) -> Result<CatalogIndex, DomainError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        DomainError::configuration(format!("Failed to read catalog file {}: {}", path.display(), e))
    })?;

    let catalog = CatalogIndex::from_json(&raw)?;

    if catalog.is_empty() {
        return Err(DomainError::configuration(format!(
            "Catalog file {} contains no operations",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        tools = catalog.tools().len(),
        operations = catalog.operation_count(),
        "Loaded tool catalog"
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_catalog_from_file() {
        let path = write_temp(
            "flowgen-catalog-ok.json",
            r#"[{
                "slug": "gmail",
                "displayName": "Gmail",
                "operations": [{"slug": "send-email", "displayName": "Send Email"}]
            }]"#,
        );

        let catalog = load_catalog(&path).unwrap();

        assert_eq!(catalog.operation_count(), 1);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = load_catalog(Path::new("/nonexistent/catalog.json"));

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_empty_catalog_is_configuration_error() {
        let path = write_temp("flowgen-catalog-empty.json", "[]");

        let result = load_catalog(&path);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
