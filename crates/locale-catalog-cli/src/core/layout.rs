use crate::core::{CliError, LanguageCode, ModuleNotFoundError, SearchPathNotFoundError};
use std::path::{Component, Path, PathBuf};

/// Name of the directory holding per-language catalogs.
pub const LC_MESSAGES: &str = "LC_MESSAGES";

/// Filesystem locations derived from a module name and project directory.
///
/// ```text
/// <project_dir>/<module>/<package path>/locale/<domain>.pot
/// <project_dir>/<module>/<package path>/locale/<lang>/LC_MESSAGES/<domain>.po
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleLayout {
    /// The module name as given on the command line.
    pub module: String,
    /// Base name of the template and catalog files.
    pub domain: String,
    /// `<project_dir>/<module>`.
    pub module_dir: PathBuf,
    /// The module's package directory inside `module_dir`.
    pub search_path: PathBuf,
    /// `<search_path>/locale`.
    pub locale_dir: PathBuf,
    /// `<locale_dir>/<domain>.pot`.
    pub template: PathBuf,
}

impl ModuleLayout {
    pub fn derive(project_dir: &Path, module: &str) -> Self {
        let package = module.replace('-', "_");
        let domain = package.replace('.', "_");

        let module_dir = project_dir.join(module);
        let search_path = package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .fold(module_dir.clone(), |path, segment| path.join(segment));
        let locale_dir = search_path.join("locale");
        let template = locale_dir.join(format!("{}.pot", domain));

        Self {
            module: module.to_string(),
            domain,
            module_dir,
            search_path,
            locale_dir,
            template,
        }
    }

    /// `<locale_dir>/<lang>/LC_MESSAGES`.
    pub fn catalog_dir(&self, language: &LanguageCode) -> PathBuf {
        self.locale_dir.join(language.as_str()).join(LC_MESSAGES)
    }

    /// `<locale_dir>/<lang>/LC_MESSAGES/<domain>.po`.
    pub fn catalog_path(&self, language: &LanguageCode) -> PathBuf {
        self.catalog_dir(language).join(self.catalog_file_name())
    }

    /// File name of this module's catalogs.
    pub fn catalog_file_name(&self) -> String {
        format!("{}.po", self.domain)
    }

    /// Fails when the module directory or its package directory is missing.
    ///
    /// A module name that is not a single plain path component is treated
    /// as missing, so the derived paths never leave the project directory.
    pub fn verify(&self) -> Result<(), CliError> {
        if !is_plain_name(&self.module) || !self.module_dir.is_dir() {
            return Err(ModuleNotFoundError {
                path: self.module_dir.clone(),
            }
            .into());
        }

        if !self.search_path.is_dir() {
            return Err(SearchPathNotFoundError {
                path: self.search_path.clone(),
                module: self.module.clone(),
            }
            .into());
        }

        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
