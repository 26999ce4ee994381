//! Default-data providers used when the search service cannot answer.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::records::BusinessRecord;
use crate::ConfigError;

/// Supplies the records shown in demo mode.
pub trait FallbackProvider: Send + Sync {
    fn records(&self) -> Vec<BusinessRecord>;
}

/// The built-in Toronto coffee-shop sample set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoDataset;

/// A sample set loaded from a YAML file.
#[derive(Debug, Clone)]
pub struct FileDataset {
    records: Vec<BusinessRecord>,
}

/// Provides no records, so a failed search renders the empty state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackProvider for DemoDataset {
    fn records(&self) -> Vec<BusinessRecord> {
        DEMO_RECORDS
            .iter()
            .map(|d| BusinessRecord {
                place_id: Some(d.place_id.to_string()),
                name: d.name.to_string(),
                address: Some(d.address.to_string()),
                rating: Some(d.rating),
                website: d.website.map(str::to_string),
                phone_number: None,
                matched_on: Some(d.matched_on.to_string()),
                matched_text: Some(d.matched_text.to_string()),
                relevance_score: Some(d.relevance_score),
            })
            .collect()
    }
}

impl FallbackProvider for FileDataset {
    fn records(&self) -> Vec<BusinessRecord> {
        self.records.clone()
    }
}

impl FallbackProvider for NoFallback {
    fn records(&self) -> Vec<BusinessRecord> {
        Vec::new()
    }
}

impl<T: FallbackProvider + ?Sized> FallbackProvider for Box<T> {
    fn records(&self) -> Vec<BusinessRecord> {
        (**self).records()
    }
}

#[derive(Debug, Deserialize)]
struct FallbackFile {
    records: Vec<BusinessRecord>,
}

/// Load and validate a fallback dataset from a YAML file.
///
/// The file holds a top-level `records:` list using the same field names the
/// search service returns.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_fallback_file(path: &Path) -> Result<FileDataset, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FallbackFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: FallbackFile = serde_yaml::from_str(&content)?;
    validate_records(&file.records)?;

    tracing::debug!(
        path = %path.display(),
        count = file.records.len(),
        "loaded fallback dataset"
    );

    Ok(FileDataset {
        records: file.records,
    })
}

fn validate_records(records: &[BusinessRecord]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for record in records {
        if record.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "record name must be non-empty".to_string(),
            ));
        }

        if let Some(id) = record.place_id.as_deref() {
            if !seen_ids.insert(id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate place_id: '{id}' (from record '{}')",
                    record.name
                )));
            }
        }
    }

    Ok(())
}

struct DemoRecord {
    place_id: &'static str,
    name: &'static str,
    address: &'static str,
    rating: f64,
    website: Option<&'static str>,
    matched_on: &'static str,
    matched_text: &'static str,
    relevance_score: f64,
}

const DEMO_RECORDS: &[DemoRecord] = &[
    DemoRecord {
        place_id: "mock_1",
        name: "Brew & Bytes Coffee",
        address: "123 Queen St W, Toronto, ON",
        rating: 4.5,
        website: Some("https://brewandbytes.com"),
        matched_on: "review",
        matched_text: "Great wifi and plenty of power outlets. Perfect spot for remote work with excellent coffee.",
        relevance_score: 95.2,
    },
    DemoRecord {
        place_id: "mock_2",
        name: "Tech Cafe Downtown",
        address: "456 King St E, Toronto, ON",
        rating: 4.7,
        website: Some("https://techcafe.ca"),
        matched_on: "review",
        matched_text: "Fast internet, quiet atmosphere, and comfortable seating. Laptop-friendly with great espresso.",
        relevance_score: 92.8,
    },
    DemoRecord {
        place_id: "mock_3",
        name: "The Study Lounge",
        address: "789 Bloor St W, Toronto, ON",
        rating: 4.3,
        website: None,
        matched_on: "description",
        matched_text: "Coffee shop designed for students and remote workers with free high-speed wifi.",
        relevance_score: 89.5,
    },
    DemoRecord {
        place_id: "mock_4",
        name: "Espresso & Code",
        address: "321 Yonge St, Toronto, ON",
        rating: 4.6,
        website: Some("https://espressoandcode.com"),
        matched_on: "review",
        matched_text: "Developer-friendly cafe with standing desks and blazing fast wifi. Great cold brew too!",
        relevance_score: 94.1,
    },
    DemoRecord {
        place_id: "mock_5",
        name: "Caffeine Terminal",
        address: "654 Dundas St W, Toronto, ON",
        rating: 4.4,
        website: Some("https://caffeineterminal.ca"),
        matched_on: "review",
        matched_text: "Tech-themed coffee shop with excellent connectivity and a productive vibe.",
        relevance_score: 88.7,
    },
    DemoRecord {
        place_id: "mock_6",
        name: "The Digital Grind",
        address: "987 College St, Toronto, ON",
        rating: 4.2,
        website: None,
        matched_on: "review",
        matched_text: "Quiet workspace with reliable wifi and fresh pastries. Lots of regulars working on laptops.",
        relevance_score: 87.3,
    },
    DemoRecord {
        place_id: "mock_7",
        name: "Java Junction",
        address: "147 Spadina Ave, Toronto, ON",
        rating: 4.8,
        website: Some("https://javajunction.ca"),
        matched_on: "review",
        matched_text: "Amazing wifi speed, comfortable chairs, and the best lattes in town. Work-friendly environment.",
        relevance_score: 96.4,
    },
    DemoRecord {
        place_id: "mock_8",
        name: "Pixel & Pour",
        address: "258 Queen St E, Toronto, ON",
        rating: 4.5,
        website: Some("https://pixelandpour.com"),
        matched_on: "description",
        matched_text: "Modern coffee shop catering to creatives and tech workers with fast internet and great coffee.",
        relevance_score: 90.2,
    },
    DemoRecord {
        place_id: "mock_9",
        name: "Remote Workers Haven",
        address: "369 Harbord St, Toronto, ON",
        rating: 4.7,
        website: Some("https://remotehaven.ca"),
        matched_on: "review",
        matched_text: "Specifically designed for remote work with meeting rooms, printing services, and excellent wifi.",
        relevance_score: 97.1,
    },
    DemoRecord {
        place_id: "mock_10",
        name: "Code & Coffee Co.",
        address: "741 Bathurst St, Toronto, ON",
        rating: 4.3,
        website: None,
        matched_on: "review",
        matched_text: "Programmer-friendly spot with multiple monitors allowed, fast wifi, and specialty coffee drinks.",
        relevance_score: 91.6,
    },
];
