//! Test/focal file classification and pairing.
//!
//! Test files are source files containing the test annotation; focal
//! candidates are the remaining files outside the test source root. A test
//! file is paired with the focal file whose lower-cased path equals the test
//! path after the test root is rewritten to the main root and every `test`
//! token is deleted.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::core::config::{FocalcovConfig, PairingConfig, ParserConfig};
use crate::core::errors::Result;
use crate::core::file_utils::{
    list_source_files, list_source_files_excluding, resolve_relative, FileReader,
};

/// Test file → focal file, in test file order.
pub type FilePairs = IndexMap<String, String>;

/// Classifies a repository's source files and pairs tests with focal files.
#[derive(Debug, Clone, Default)]
pub struct FilePairer {
    parser: ParserConfig,
    pairing: PairingConfig,
}

impl FilePairer {
    /// Create a pairer from explicit settings
    pub fn new(parser: ParserConfig, pairing: PairingConfig) -> Self {
        Self { parser, pairing }
    }

    /// Create a pairer from a run configuration
    pub fn from_config(config: &FocalcovConfig) -> Self {
        Self::new(config.parser.clone(), config.pairing.clone())
    }

    /// Source files whose text contains the test annotation.
    pub fn find_test_files(&self, root: &Path) -> Result<Vec<String>> {
        let annotation = self.parser.test_annotation.as_str();
        Ok(self
            .find_java_files(root)?
            .into_iter()
            .filter(|file| FileReader::contains_token(&resolve_relative(root, file), annotation))
            .collect())
    }

    /// Every source file under `root`.
    pub fn find_java_files(&self, root: &Path) -> Result<Vec<String>> {
        list_source_files(root, &self.parser.file_extension)
    }

    /// Files outside the test source root that are not test files, sorted.
    pub fn find_focal_files(&self, java_files: &[String], test_files: &[String]) -> Vec<String> {
        let test_root = self.pairing.test_root_fragment();
        let tests: BTreeSet<&str> = test_files.iter().map(String::as_str).collect();

        java_files
            .iter()
            .filter(|file| !file.contains(test_root))
            .filter(|file| !tests.contains(file.as_str()))
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Pair each test file with the first focal file its normalized path equals.
    ///
    /// Tests without a counterpart are dropped. When several focal files
    /// normalize to the same path the first in list order wins.
    pub fn map_test_to_focal_files(&self, focal_files: &[String], test_files: &[String]) -> FilePairs {
        let normalized_focal: Vec<String> = focal_files.iter().map(|f| f.to_lowercase()).collect();

        let mut pairs = FilePairs::new();
        for test_file in test_files {
            let normalized = self.normalize_test_path(test_file);
            let mut matches = normalized_focal
                .iter()
                .enumerate()
                .filter(|(_, focal)| **focal == normalized)
                .map(|(index, _)| index);

            let Some(index) = matches.next() else {
                continue;
            };
            let ties = matches.count();
            if ties > 0 {
                debug!(
                    "{} focal files normalize to {}; pairing {} with {}",
                    ties + 1,
                    normalized,
                    test_file,
                    focal_files[index]
                );
            }
            pairs.insert(test_file.clone(), focal_files[index].clone());
        }
        pairs
    }

    /// Classify and pair all files under `root`.
    pub fn pair_files(&self, root: &Path) -> Result<FilePairs> {
        self.pair_files_excluding(root, &[])
    }

    /// Classify and pair the files under `root` that lie outside the
    /// `excluded` module directories.
    pub fn pair_files_excluding(&self, root: &Path, excluded: &[PathBuf]) -> Result<FilePairs> {
        let java_files =
            list_source_files_excluding(root, &self.parser.file_extension, excluded)?;
        let annotation = self.parser.test_annotation.as_str();
        let test_files: Vec<String> = java_files
            .iter()
            .filter(|file| FileReader::contains_token(&resolve_relative(root, file), annotation))
            .cloned()
            .collect();
        let focal_files = self.find_focal_files(&java_files, &test_files);
        let pairs = self.map_test_to_focal_files(&focal_files, &test_files);

        info!(
            "{}: {} source files, {} test files, {} focal candidates, {} paired",
            root.display(),
            java_files.len(),
            test_files.len(),
            focal_files.len(),
            pairs.len()
        );
        Ok(pairs)
    }

    fn normalize_test_path(&self, test_file: &str) -> String {
        test_file
            .to_lowercase()
            .replace(
                &self.pairing.test_source_root.to_lowercase(),
                &self.pairing.main_source_root.to_lowercase(),
            )
            .replace(&self.pairing.test_token.to_lowercase(), "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const UI: &str = "app/src/main/java/com/example/guessthenumber/ui/CommandLineUi.java";
    const UI_TEST: &str = "app/src/test/java/com/example/guessthenumber/ui/CommandLineUiTest.java";
    const LOGIC: &str = "app/src/main/java/com/example/guessthenumber/logic/StandardLogic.java";
    const LOGIC_TEST: &str =
        "app/src/test/java/com/example/guessthenumber/logic/StandardLogicTest.java";
    const ROUND_TRIP_IT: &str = "app/src/test/java/com/example/guessthenumber/GameIT.java";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_focal_files_exclude_test_root_and_test_files() {
        let pairer = FilePairer::default();
        let java = strings(&[
            LOGIC,
            UI,
            UI_TEST,
            "app/src/main/java/com/example/guessthenumber/Fixtures.java",
        ]);
        let tests = strings(&[UI_TEST, "app/src/main/java/com/example/guessthenumber/Fixtures.java"]);

        assert_eq!(pairer.find_focal_files(&java, &tests), strings(&[LOGIC, UI]));
    }

    #[test]
    fn test_map_test_to_focal_files() {
        let pairer = FilePairer::default();
        let focal = strings(&[LOGIC, UI]);
        let tests = strings(&[UI_TEST, ROUND_TRIP_IT, LOGIC_TEST]);

        let pairs = pairer.map_test_to_focal_files(&focal, &tests);
        let ordered: Vec<_> = pairs.iter().map(|(t, f)| (t.as_str(), f.as_str())).collect();
        assert_eq!(ordered, vec![(UI_TEST, UI), (LOGIC_TEST, LOGIC)]);
    }

    #[test]
    fn test_tie_breaks_on_first_focal_file() {
        let pairer = FilePairer::default();
        let focal = strings(&["src/main/java/Widget.java", "src/main/java/widget.java"]);
        let tests = strings(&["src/test/java/WidgetTest.java"]);

        let pairs = pairer.map_test_to_focal_files(&focal, &tests);
        assert_eq!(pairs["src/test/java/WidgetTest.java"], "src/main/java/Widget.java");
    }

    #[test]
    fn test_every_test_token_is_removed() {
        let pairer = FilePairer::default();
        let focal = strings(&["src/main/java/Parser.java"]);
        let tests = strings(&["src/test/java/TestParserTest.java"]);

        let pairs = pairer.map_test_to_focal_files(&focal, &tests);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_pair_files_on_disk() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for (path, body) in [
            (UI, "package com.example.guessthenumber.ui;\nclass CommandLineUi {}\n"),
            (
                UI_TEST,
                "package com.example.guessthenumber.ui;\nclass CommandLineUiTest {\n  @Test\n  void testRun() {}\n}\n",
            ),
            (LOGIC, "package com.example.guessthenumber.logic;\nclass StandardLogic {}\n"),
        ] {
            let full = resolve_relative(root, path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, body).unwrap();
        }

        let pairer = FilePairer::default();
        assert_eq!(pairer.find_test_files(root).unwrap(), strings(&[UI_TEST]));
        assert_eq!(pairer.find_java_files(root).unwrap(), strings(&[LOGIC, UI, UI_TEST]));

        let pairs = pairer.pair_files(root).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[UI_TEST], UI);
    }

    #[test]
    fn test_pair_files_excluding_nested_module() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for (path, body) in [
            (UI, "package com.example.guessthenumber.ui;\nclass CommandLineUi {}\n"),
            (
                UI_TEST,
                "package com.example.guessthenumber.ui;\nclass CommandLineUiTest {\n  @Test\n  void testRun() {}\n}\n",
            ),
        ] {
            let full = resolve_relative(root, path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, body).unwrap();
        }

        let pairer = FilePairer::default();
        assert_eq!(pairer.pair_files(root).unwrap().len(), 1);
        assert!(pairer
            .pair_files_excluding(root, &[root.join("app")])
            .unwrap()
            .is_empty());
        assert_eq!(
            pairer.pair_files_excluding(&root.join("app"), &[]).unwrap().len(),
            1
        );
    }
}
