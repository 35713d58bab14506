//! Citation metadata block

use serde::{Deserialize, Serialize};

use super::block::{Field, MetadataBlock};
use crate::{Error, Result};

/// Subject vocabulary of the Dataverse citation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Subject {
    AgriculturalSciences,
    ArtsAndHumanities,
    AstronomyAndAstrophysics,
    BusinessAndManagement,
    Chemistry,
    ComputerAndInformationScience,
    EarthAndEnvironmentalSciences,
    Engineering,
    Law,
    MathematicalSciences,
    MedicineHealthAndLifeSciences,
    Physics,
    SocialSciences,
    Other,
}

impl Subject {
    /// Vocabulary term as Dataverse spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AgriculturalSciences => "Agricultural Sciences",
            Self::ArtsAndHumanities => "Arts and Humanities",
            Self::AstronomyAndAstrophysics => "Astronomy and Astrophysics",
            Self::BusinessAndManagement => "Business and Management",
            Self::Chemistry => "Chemistry",
            Self::ComputerAndInformationScience => "Computer and Information Science",
            Self::EarthAndEnvironmentalSciences => "Earth and Environmental Sciences",
            Self::Engineering => "Engineering",
            Self::Law => "Law",
            Self::MathematicalSciences => "Mathematical Sciences",
            Self::MedicineHealthAndLifeSciences => "Medicine, Health and Life Sciences",
            Self::Physics => "Physics",
            Self::SocialSciences => "Social Sciences",
            Self::Other => "Other",
        }
    }
}

/// Dataset author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Institution, if any
    pub affiliation: Option<String>,
}

/// Dataset point of contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name
    pub name: String,
    /// Email address Dataverse forwards messages to
    pub email: String,
}

/// Descriptive citation metadata attached to every dataset.
///
/// Dataverse requires a title, at least one author, contact, description
/// and subject; [`Citation::to_block`] enforces this before upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    title: String,
    descriptions: Vec<String>,
    subjects: Vec<Subject>,
    authors: Vec<Author>,
    contacts: Vec<Contact>,
}

impl Citation {
    /// Create a citation with a title and nothing else.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            descriptions: Vec::new(),
            subjects: Vec::new(),
            authors: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Add a description paragraph.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.descriptions.push(text.into());
        self
    }

    /// Add a subject.
    #[must_use]
    pub fn subject(mut self, subject: Subject) -> Self {
        if !self.subjects.contains(&subject) {
            self.subjects.push(subject);
        }
        self
    }

    /// Add an author without affiliation.
    #[must_use]
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.authors.push(Author {
            name: name.into(),
            affiliation: None,
        });
        self
    }

    /// Add an author with affiliation.
    #[must_use]
    pub fn affiliated_author(
        mut self,
        name: impl Into<String>,
        affiliation: impl Into<String>,
    ) -> Self {
        self.authors.push(Author {
            name: name.into(),
            affiliation: Some(affiliation.into()),
        });
        self
    }

    /// Add a contact.
    #[must_use]
    pub fn contact(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.contacts.push(Contact {
            name: name.into(),
            email: email.into(),
        });
        self
    }

    /// Get the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the authors.
    #[must_use]
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Check that every field Dataverse requires is present.
    ///
    /// # Errors
    ///
    /// `Error::Schema` naming the first missing or invalid field.
    pub fn validate(&self) -> Result<()> {
        let missing = |field: &str| Err(Error::Schema(format!("citation is missing {field}")));
        if self.title.trim().is_empty() {
            return missing("a title");
        }
        if self.authors.is_empty() {
            return missing("an author");
        }
        if self.contacts.is_empty() {
            return missing("a contact");
        }
        if self.descriptions.is_empty() {
            return missing("a description");
        }
        if self.subjects.is_empty() {
            return missing("a subject");
        }
        if let Some(bad) = self.contacts.iter().find(|c| !c.email.contains('@')) {
            return Err(Error::Schema(format!(
                "contact '{}' has an invalid email '{}'",
                bad.name, bad.email
            )));
        }
        Ok(())
    }

    /// Render as the `citation` metadata block.
    ///
    /// # Errors
    ///
    /// See [`Citation::validate`].
    pub fn to_block(&self) -> Result<MetadataBlock> {
        self.validate()?;

        let mut block = MetadataBlock::new("Citation Metadata");
        block.push(Field::primitive("title", &self.title));
        block.push(Field::compound(
            "author",
            self.authors
                .iter()
                .map(|a| {
                    let mut fields = vec![Field::primitive("authorName", &a.name)];
                    if let Some(affiliation) = &a.affiliation {
                        fields.push(Field::primitive("authorAffiliation", affiliation));
                    }
                    fields
                })
                .collect(),
        ));
        block.push(Field::compound(
            "datasetContact",
            self.contacts
                .iter()
                .map(|c| {
                    vec![
                        Field::primitive("datasetContactName", &c.name),
                        Field::primitive("datasetContactEmail", &c.email),
                    ]
                })
                .collect(),
        ));
        block.push(Field::compound(
            "dsDescription",
            self.descriptions
                .iter()
                .map(|d| vec![Field::primitive("dsDescriptionValue", d)])
                .collect(),
        ));
        block.push(Field::vocabulary(
            "subject",
            self.subjects.iter().map(|s| s.as_str().to_string()).collect(),
        ));
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::block::FieldValue;

    fn complete() -> Citation {
        Citation::new("ML-Session Gradient Boosting Example")
            .description("This is an example")
            .subject(Subject::ComputerAndInformationScience)
            .author("Doe, Jane")
            .contact("Doe, Jane", "jane.doe@example.org")
    }

    #[test]
    fn test_complete_citation_block() {
        let block = complete().to_block().unwrap();
        assert_eq!(
            block.field("title").unwrap().value(),
            &FieldValue::Text("ML-Session Gradient Boosting Example".to_string())
        );
        assert_eq!(
            block.field("subject").unwrap().value(),
            &FieldValue::Texts(vec!["Computer and Information Science".to_string()])
        );
        assert!(block.field("datasetContact").is_some());
        assert!(block.field("dsDescription").is_some());
    }

    #[test]
    fn test_missing_author_rejected() {
        let citation = Citation::new("t")
            .description("d")
            .subject(Subject::Other)
            .contact("c", "c@example.org");
        let err = citation.to_block().unwrap_err();
        assert!(err.to_string().contains("author"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let citation = complete().contact("Bob", "not-an-email");
        assert!(citation.validate().is_err());
    }

    #[test]
    fn test_subject_not_repeated() {
        let block = complete()
            .subject(Subject::ComputerAndInformationScience)
            .to_block()
            .unwrap();
        assert_eq!(
            block.field("subject").unwrap().value(),
            &FieldValue::Texts(vec!["Computer and Information Science".to_string()])
        );
    }
}
