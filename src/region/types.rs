//! Region module core types

use crate::page_config::PageConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================
// Core Data Structures
// ============================================================

/// Region purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    /// Area excluded from text extraction
    #[serde(alias = "ignore")]
    Exclude,
    /// Area holding the printed page number
    PageNumber,
}

/// Rectangle in PDF user space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X coordinate (left)
    pub x: f64,
    /// Y coordinate (top)
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// User-drawn region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    /// User-provided name
    pub name: String,
    pub region_type: RegionType,
    /// Physical pages the region applies to
    pub page_config: PageConfig,
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_visible() -> bool {
    true
}

impl Region {
    /// Create a visible region with an empty bounding box
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        region_type: RegionType,
        page_config: PageConfig,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region_type,
            page_config,
            bbox: BoundingBox::default(),
            visible: true,
            created_at: Utc::now(),
        }
    }

    /// Whether this region localizes page-number OCR
    pub fn is_page_number(&self) -> bool {
        self.region_type == RegionType::PageNumber
    }

    /// Id/name pair used in conflict reports and segments
    pub fn to_ref(&self) -> RegionRef {
        RegionRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Id/name reference to a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRef {
    pub id: String,
    pub name: String,
}

/// Page label read by OCR from a page-number region
///
/// Supplied by the text-extraction collaborator; read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDerivedPageNumber {
    /// Physical page (1-indexed)
    pub document_page: u32,
    /// Detected label
    pub canonical_page: String,
    pub region_id: String,
    #[serde(default)]
    pub region_name: String,
}

impl RegionDerivedPageNumber {
    pub fn new(
        document_page: u32,
        canonical_page: impl Into<String>,
        region_id: impl Into<String>,
        region_name: impl Into<String>,
    ) -> Self {
        Self {
            document_page,
            canonical_page: canonical_page.into(),
            region_id: region_id.into(),
            region_name: region_name.into(),
        }
    }
}

/// Page claimed by more than one page-number region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNumberConflict {
    pub page_number: u32,
    pub regions: Vec<RegionRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_type_serde() {
        let parsed: RegionType = serde_json::from_str("\"page_number\"").unwrap();
        assert_eq!(parsed, RegionType::PageNumber);
        let parsed: RegionType = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(parsed, RegionType::Exclude);
    }

    #[test]
    fn test_region_defaults_from_json() {
        let json = r#"{
            "id": "r1",
            "name": "Footer",
            "region_type": "page_number",
            "page_config": {"mode": "all_pages"}
        }"#;
        let region: Region = serde_json::from_str(json).unwrap();
        assert!(region.visible);
        assert!(region.is_page_number());
        assert_eq!(region.bbox, BoundingBox::default());
        assert_eq!(region.page_config, PageConfig::all_pages());
    }

    #[test]
    fn test_region_bbox_from_json() {
        let json = r#"{
            "id": "r2",
            "name": "Header",
            "region_type": "exclude",
            "page_config": {"mode": "all_pages"},
            "bbox": {"x": 10.0, "y": 20.0, "width": 30.0, "height": 4.0}
        }"#;
        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region.bbox.width, 30.0);
        assert_eq!(region.bbox.height, 4.0);
    }

    #[test]
    fn test_region_ref() {
        let region = Region::new("r9", "Header", RegionType::Exclude, PageConfig::this_page(1));
        assert_eq!(
            region.to_ref(),
            RegionRef {
                id: "r9".to_string(),
                name: "Header".to_string()
            }
        );
    }
}
