use serde::{Deserialize, Serialize};

use crate::markdown::Block;

/// One markdown document inside the documentation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFile {
    /// File base name without extension, e.g. "first-steps"
    pub name: String,
    /// Level-1 heading text, or a title synthesized from the file name
    pub title: String,
    /// Bounded excerpt of the first plain paragraph (may be empty)
    pub description: String,
    /// `/`-separated path relative to the documentation root, e.g. "guides/first-steps.md"
    pub path: String,
    /// File size in bytes
    pub size: u64,
}

/// A top-level folder directly under the documentation root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSection {
    /// Folder name, e.g. "getting-started"
    pub id: String,
    /// Display title, e.g. "Getting Started"
    pub title: String,
    /// Folder path relative to the documentation root
    pub path: String,
    pub files: Vec<DocFile>,
    pub subsections: Vec<DocSubsection>,
}

/// A folder nested one level inside a section. Deeper folders are not modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSubsection {
    pub id: String,
    pub title: String,
    pub path: String,
    pub files: Vec<DocFile>,
}

/// The full documentation tree returned by the structure endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsStructure {
    pub sections: Vec<DocSection>,
    /// Every markdown file present in `sections`
    pub total_files: usize,
    /// Files under a section or subsection whose id marks it as tutorial content
    pub total_tutorials: usize,
}

impl DocsStructure {
    /// Iterate every file in the tree, section files before subsection files.
    pub fn files(&self) -> impl Iterator<Item = &DocFile> {
        self.sections.iter().flat_map(|section| {
            section
                .files
                .iter()
                .chain(section.subsections.iter().flat_map(|sub| sub.files.iter()))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocContentResponse {
    pub content: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedDocResponse {
    pub path: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_serializes_counts_in_camel_case() {
        let structure = DocsStructure {
            sections: vec![],
            total_files: 3,
            total_tutorials: 1,
        };
        let json = serde_json::to_value(&structure).unwrap();
        assert_eq!(json["totalFiles"], 3);
        assert_eq!(json["totalTutorials"], 1);
        assert!(json["sections"].as_array().unwrap().is_empty());
    }

    #[test]
    fn files_walks_sections_then_subsections() {
        let file = |path: &str| DocFile {
            name: path.to_string(),
            title: path.to_string(),
            description: String::new(),
            path: path.to_string(),
            size: 0,
        };
        let structure = DocsStructure {
            sections: vec![DocSection {
                id: "guides".to_string(),
                title: "Guides".to_string(),
                path: "guides".to_string(),
                files: vec![file("guides/a.md")],
                subsections: vec![DocSubsection {
                    id: "advanced".to_string(),
                    title: "Advanced".to_string(),
                    path: "guides/advanced".to_string(),
                    files: vec![file("guides/advanced/b.md")],
                }],
            }],
            total_files: 2,
            total_tutorials: 0,
        };
        let paths: Vec<&str> = structure.files().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["guides/a.md", "guides/advanced/b.md"]);
    }
}
