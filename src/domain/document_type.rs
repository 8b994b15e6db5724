//! Document categories offered by the PCI SSC document library filter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown document type '{0}'")]
pub struct UnknownDocumentType(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    #[default]
    #[serde(rename = "All Document")]
    AllDocuments,
    #[serde(rename = "PCI DSS")]
    PciDss,
    #[serde(rename = "SAQ")]
    Saq,
    #[serde(rename = "P2PE")]
    P2pe,
    #[serde(rename = "PTS")]
    Pts,
    #[serde(rename = "Card Production")]
    CardProduction,
    #[serde(rename = "MPoC")]
    Mpoc,
    #[serde(rename = "3DS")]
    ThreeDs,
    #[serde(rename = "CPoC")]
    Cpoc,
    #[serde(rename = "PIN")]
    Pin,
    #[serde(rename = "SPoC")]
    Spoc,
    #[serde(rename = "TSP")]
    Tsp,
    #[serde(rename = "Software Security")]
    SoftwareSecurity,
    #[serde(rename = "Programs and Certification")]
    ProgramsAndCertification,
    #[serde(rename = "Guidance Document")]
    GuidanceDocument,
    #[serde(rename = "Case Study")]
    CaseStudy,
}

impl DocumentType {
    pub const ALL: [DocumentType; 16] = [
        Self::AllDocuments,
        Self::PciDss,
        Self::Saq,
        Self::P2pe,
        Self::Pts,
        Self::CardProduction,
        Self::Mpoc,
        Self::ThreeDs,
        Self::Cpoc,
        Self::Pin,
        Self::Spoc,
        Self::Tsp,
        Self::SoftwareSecurity,
        Self::ProgramsAndCertification,
        Self::GuidanceDocument,
        Self::CaseStudy,
    ];

    /// Label as shown on the site
    pub fn label(self) -> &'static str {
        match self {
            Self::AllDocuments => "All Document",
            Self::PciDss => "PCI DSS",
            Self::Saq => "SAQ",
            Self::P2pe => "P2PE",
            Self::Pts => "PTS",
            Self::CardProduction => "Card Production",
            Self::Mpoc => "MPoC",
            Self::ThreeDs => "3DS",
            Self::Cpoc => "CPoC",
            Self::Pin => "PIN",
            Self::Spoc => "SPoC",
            Self::Tsp => "TSP",
            Self::SoftwareSecurity => "Software Security",
            Self::ProgramsAndCertification => "Programs and Certification",
            Self::GuidanceDocument => "Guidance Document",
            Self::CaseStudy => "Case Study",
        }
    }

    /// Whether a document filed under `category` passes this filter
    pub fn admits(self, category: &str) -> bool {
        match self {
            Self::AllDocuments => true,
            other => category.trim().eq_ignore_ascii_case(other.label()),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownDocumentType(s.to_string()))
    }
}
