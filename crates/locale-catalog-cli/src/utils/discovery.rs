use crate::core::{CatalogFile, LC_MESSAGES};
use anyhow::{Context as _, Result};
use fs_err as fs;
use std::path::Path;

/// Get all language directories under a locale directory.
///
/// Returns a sorted list of directory names. Hidden entries are skipped, the
/// same way a shell `*` glob would.
pub fn get_all_languages(locale_dir: &Path) -> Result<Vec<String>> {
    let mut languages = Vec::new();

    if !locale_dir.is_dir() {
        return Ok(languages);
    }

    for entry in fs::read_dir(locale_dir).context("Failed to read locale directory")? {
        let entry = entry?;
        if entry.file_type()?.is_dir()
            && let Some(name) = entry.file_name().to_str()
            && !name.starts_with('.')
        {
            languages.push(name.to_string());
        }
    }

    languages.sort();
    Ok(languages)
}

/// Find `.po` files matching `<locale_dir>/*/LC_MESSAGES/<file_name>`.
///
/// With `file_name` set to `None` every `.po` file is returned. Results are
/// ordered by language, then by file name.
pub fn discover_catalogs(locale_dir: &Path, file_name: Option<&str>) -> Result<Vec<CatalogFile>> {
    let mut catalogs = Vec::new();

    for language in get_all_languages(locale_dir)? {
        let messages_dir = locale_dir.join(&language).join(LC_MESSAGES);
        if !messages_dir.is_dir() {
            continue;
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(&messages_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("po")
            {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') || file_name.is_some_and(|wanted| wanted != name) {
                continue;
            }

            found.push(path);
        }

        found.sort();
        catalogs.extend(found.into_iter().map(|path| CatalogFile {
            language: language.clone(),
            path,
        }));
    }

    Ok(catalogs)
}
