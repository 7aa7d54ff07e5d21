//! Flat display fields projected out of an index card's resource metadata.

use std::fmt::Display;

use crate::linked_data::{PropertyBag, PropertyValue};
use crate::search_const::{DOI_HOST, ORCID_HOST, WITHDRAWAL_PROPERTY};
use crate::search_result::IndexCard;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Registration,
    Preprint,
    ProjectComponent,
    RegistrationComponent,
    User,
    File,
    Unknown,
}

/// Checked top to bottom; the first row any type IRI matches wins.
const RESOURCE_KIND_TABLE: [(&str, ResourceKind); 7] = [
    ("Project", ResourceKind::Project),
    ("Registration", ResourceKind::Registration),
    ("Preprint", ResourceKind::Preprint),
    ("ProjectComponent", ResourceKind::ProjectComponent),
    ("RegistrationComponent", ResourceKind::RegistrationComponent),
    ("Person", ResourceKind::User),
    ("File", ResourceKind::File),
];

impl ResourceKind {
    pub fn from_type_iris<'a>(type_iris: impl IntoIterator<Item = &'a str>) -> ResourceKind {
        let local_names: Vec<&str> = type_iris.into_iter().map(local_name).collect();
        RESOURCE_KIND_TABLE
            .iter()
            .find(|(name, _)| local_names.contains(name))
            .map(|(_, kind)| *kind)
            .unwrap_or(ResourceKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::Registration => "registration",
            ResourceKind::Preprint => "preprint",
            ResourceKind::ProjectComponent => "project_component",
            ResourceKind::RegistrationComponent => "registration_component",
            ResourceKind::User => "user",
            ResourceKind::File => "file",
            ResourceKind::Unknown => "unknown",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `https://osf.io/vocab/2022/Project` and `Project` both name a project.
fn local_name(iri: &str) -> &str {
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFieldLabel {
    DateCreated,
    DateRegistered,
    DateModified,
}

impl Display for DateFieldLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DateFieldLabel::DateCreated => "Date created",
            DateFieldLabel::DateRegistered => "Date registered",
            DateFieldLabel::DateModified => "Date modified",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateField<'a> {
    pub label: DateFieldLabel,
    pub date: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contributor<'a> {
    pub name: Option<&'a str>,
    pub id: Option<&'a str>,
}

/// Funder, license or provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedEntity<'a> {
    pub name: Option<&'a str>,
    pub identifier: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleAndUrl<'a> {
    pub title: Option<&'a str>,
    pub absolute_url: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedResourceKind {
    Data,
    AnalyticCode,
    Materials,
    Papers,
    Supplemental,
}

impl LinkedResourceKind {
    fn property(&self) -> &'static str {
        match self {
            LinkedResourceKind::Data => "hasDataResource",
            LinkedResourceKind::AnalyticCode => "hasAnalyticCodeResource",
            LinkedResourceKind::Materials => "hasMaterialsResource",
            LinkedResourceKind::Papers => "hasPapersResource",
            LinkedResourceKind::Supplemental => "hasSupplementalResource",
        }
    }
}


/// Read-only projection of one card. Every accessor degrades to `None` or
/// an empty list when the metadata lacks what it looks for.
#[derive(Debug, Clone, Copy)]
pub struct ResourceMetadata<'a> {
    card: &'a IndexCard,
    kind: ResourceKind,
}

impl<'a> ResourceMetadata<'a> {
    pub fn new(card: &'a IndexCard) -> Self {
        let kind = ResourceKind::from_type_iris(card.resource_metadata.type_iris());
        Self { card, kind }
    }

    fn bag(&self) -> &'a PropertyBag {
        &self.card.resource_metadata
    }

    fn container(&self) -> Option<&'a PropertyBag> {
        self.bag().first_node("isContainedBy")
    }

    pub fn resource_kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn display_title(&self) -> Option<&'a str> {
        match self.kind {
            ResourceKind::User => self.bag().first_literal("name"),
            ResourceKind::File => self.bag().first_literal("fileName"),
            _ => self.bag().first_literal("title"),
        }
    }

    pub fn file_title(&self) -> Option<&'a str> {
        match self.kind {
            ResourceKind::File => self.bag().first_literal("title"),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&'a str> {
        self.bag().first_literal("description")
    }

    pub fn absolute_url(&self) -> Option<&'a str> {
        self.bag().id.as_deref()
    }

    pub fn date_fields(&self) -> Vec<DateField<'a>> {
        let created_label = match self.kind {
            ResourceKind::User => return vec![],
            ResourceKind::Registration | ResourceKind::RegistrationComponent => DateFieldLabel::DateRegistered,
            _ => DateFieldLabel::DateCreated,
        };
        vec![
            DateField { label: created_label, date: self.bag().first_literal("dateCreated") },
            DateField { label: DateFieldLabel::DateModified, date: self.bag().first_literal("dateModified") },
        ]
    }

    /// Contributors of a resource, or of its container when it lists none.
    /// Users are left to the caller.
    pub fn affiliated_entities(&self) -> Option<Vec<Contributor<'a>>> {
        if self.kind == ResourceKind::User {
            return None;
        }
        let source = if self.bag().has_property("creator") {
            self.bag()
        } else {
            self.container().filter(|container| container.has_property("creator"))?
        };
        Some(
            source
                .nodes_of("creator")
                .map(|creator| Contributor {
                    name: creator.first_literal("name"),
                    id: creator.id.as_deref(),
                })
                .collect(),
        )
    }

    pub fn funders(&self) -> Option<Vec<NamedEntity<'a>>> {
        let source = if self.bag().has_property("funder") {
            self.bag()
        } else {
            self.container().filter(|container| container.has_property("funder"))?
        };
        Some(
            source
                .nodes_of("funder")
                .map(|funder| NamedEntity {
                    name: funder.first_literal("name"),
                    identifier: funder.first_literal("identifier"),
                })
                .collect(),
        )
    }

    pub fn license(&self) -> Option<NamedEntity<'a>> {
        let rights = match self.bag().first_value_of("rights") {
            Some(rights) => rights,
            None => self.container()?.first_value_of("rights")?,
        };
        Some(NamedEntity {
            name: rights.as_node().and_then(|node| node.first_literal("name")),
            identifier: rights.iri(),
        })
    }

    pub fn provider(&self) -> Option<NamedEntity<'a>> {
        let publisher = self.bag().first_node("publisher")?;
        Some(NamedEntity {
            name: publisher.first_literal("name"),
            identifier: publisher.id.as_deref(),
        })
    }

    pub fn is_part_of(&self) -> Option<TitleAndUrl<'a>> {
        title_and_url(self.bag(), "isPartOf")
    }

    pub fn is_contained_by(&self) -> Option<TitleAndUrl<'a>> {
        title_and_url(self.bag(), "isContainedBy")
    }

    pub fn is_part_of_collection(&self) -> Option<TitleAndUrl<'a>> {
        title_and_url(self.bag(), "isPartOfCollection")
    }

    pub fn language(&self) -> Option<&'a str> {
        self.bag().first_literal("language")
    }

    pub fn doi(&self) -> Vec<&'a str> {
        self.card
            .resource_identifier
            .iter()
            .map(String::as_str)
            .filter(|id| id.contains(DOI_HOST))
            .collect()
    }

    pub fn orcids(&self) -> Option<Vec<&'a str>> {
        if !self.bag().has_property("identifier") {
            return None;
        }
        Some(self.bag().literals_of("identifier").filter(|id| id.contains(ORCID_HOST)).collect())
    }

    pub fn resource_nature(&self) -> Option<&'a str> {
        self.bag().first_node("resourceNature")?.first_literal("displayLabel")
    }

    pub fn registration_template(&self) -> Option<&'a str> {
        self.bag().first_node("conformsTo")?.first_literal("title")
    }

    pub fn linked_resources(&self, kind: LinkedResourceKind) -> &'a [PropertyValue] {
        self.bag().values_of(kind.property())
    }

    pub fn is_withdrawn(&self) -> bool {
        self.bag().has_property("dateWithdrawn") || self.bag().has_property(WITHDRAWAL_PROPERTY)
    }
}

fn title_and_url<'a>(bag: &'a PropertyBag, property: &str) -> Option<TitleAndUrl<'a>> {
    if !bag.has_property(property) {
        return None;
    }
    let node = bag.first_node(property);
    Some(TitleAndUrl {
        title: node.and_then(|node| node.first_literal("title")),
        absolute_url: node.and_then(|node| node.id.as_deref()),
    })
}
