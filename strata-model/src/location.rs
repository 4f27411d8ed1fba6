//! Infrastructure vendors and hierarchical locations
//!
//! Vendors own a tree of locations (region, zone, site). A location is
//! addressed by a fully-qualified [`LocationKey`] of the form
//! `Vendor:segment/segment/...`, e.g. `MyCorp:USA/NY_1`. Keys are required
//! to be globally unique; duplicates are reported during the lint pass
//! rather than at construction time.

use crate::documentation::PlainTextDocumentation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the vendor name and the location path in a key
pub const VENDOR_SEPARATOR: char = ':';

/// Separator between path segments in a key
pub const PATH_SEPARATOR: char = '/';

/// Cloud provider a vendor runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudVendor {
    /// Amazon Web Services
    Aws,

    /// Microsoft Azure
    Azure,

    /// Google Cloud Platform
    Gcp,

    /// Privately operated data centers
    Private,
}

/// Fully-qualified key addressing a single infrastructure location
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationKey(String);

impl LocationKey {
    /// Create a key from its raw string form, e.g. `MyCorp:USA/NY_1`
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a key from a vendor name and a path of location names
    pub fn from_parts(vendor: &str, path: &[&str]) -> Self {
        let mut raw = String::from(vendor);
        raw.push(VENDOR_SEPARATOR);
        raw.push_str(&path.join(&PATH_SEPARATOR.to_string()));
        Self(raw)
    }

    /// The raw string form of the key
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The vendor portion of the key (text before the first `:`)
    pub fn vendor(&self) -> &str {
        match self.0.split_once(VENDOR_SEPARATOR) {
            Some((vendor, _)) => vendor,
            None => &self.0,
        }
    }

    /// The path segments of the key (text after the first `:`, split on `/`)
    pub fn path_segments(&self) -> Vec<&str> {
        match self.0.split_once(VENDOR_SEPARATOR) {
            Some((_, path)) if !path.is_empty() => path.split(PATH_SEPARATOR).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the key has a non-empty vendor and only non-empty segments
    pub fn is_well_formed(&self) -> bool {
        if self.vendor().is_empty() {
            return false;
        }
        let segments = self.path_segments();
        !segments.is_empty() && segments.iter().all(|s| !s.is_empty())
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a vendor's location hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureLocation {
    /// Name of this location, unique among its siblings
    pub name: String,

    /// Child locations
    pub locations: Vec<InfrastructureLocation>,
}

impl InfrastructureLocation {
    /// Create a leaf location
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locations: Vec::new(),
        }
    }

    /// Create a location with child locations
    pub fn with_children(name: impl Into<String>, locations: Vec<InfrastructureLocation>) -> Self {
        Self {
            name: name.into(),
            locations,
        }
    }

    /// Find a descendant by relative path; an empty path is this location
    pub fn find(&self, path: &[&str]) -> Option<&InfrastructureLocation> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .locations
                .iter()
                .find(|loc| loc.name == *head)
                .and_then(|loc| loc.find(rest)),
        }
    }
}

/// A physical or cloud infrastructure provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureVendor {
    /// Vendor name, unique within the ecosystem
    pub name: String,

    /// Cloud provider kind
    pub cloud_vendor: CloudVendor,

    /// Documentation for the vendor
    pub documentation: Option<PlainTextDocumentation>,

    /// Root locations of the vendor's hierarchy
    pub locations: Vec<InfrastructureLocation>,
}

impl InfrastructureVendor {
    /// Create a vendor with no locations
    pub fn new(name: impl Into<String>, cloud_vendor: CloudVendor) -> Self {
        Self {
            name: name.into(),
            cloud_vendor,
            documentation: None,
            locations: Vec::new(),
        }
    }

    /// Attach documentation
    pub fn documentation(mut self, doc: PlainTextDocumentation) -> Self {
        self.documentation = Some(doc);
        self
    }

    /// Add a root location subtree
    pub fn location(mut self, location: InfrastructureLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// Declare a location by path and return its fully-qualified key.
    ///
    /// Intermediate segments are reused when they already exist; the final
    /// segment is always appended as a new declaration. Declaring the same
    /// complete path twice therefore produces duplicate sibling nodes, which
    /// the lint pass reports as a `DuplicateKey` problem instead of failing
    /// here.
    pub fn add_location(&mut self, path: &[&str]) -> LocationKey {
        let key = LocationKey::from_parts(&self.name, path);
        if let Some((last, intermediates)) = path.split_last() {
            let siblings = descend(&mut self.locations, intermediates);
            siblings.push(InfrastructureLocation::new(*last));
        }
        key
    }

    /// Find a location by path from the vendor root
    pub fn find(&self, path: &[&str]) -> Option<&InfrastructureLocation> {
        let (head, rest) = path.split_first()?;
        self.locations
            .iter()
            .find(|loc| loc.name == *head)
            .and_then(|loc| loc.find(rest))
    }

    /// Collect every fully-qualified key declared under this vendor,
    /// including duplicates, in declaration order.
    pub fn collect_keys(&self) -> Vec<LocationKey> {
        let mut keys = Vec::new();
        let mut prefix: Vec<&str> = Vec::new();
        for location in &self.locations {
            collect_keys_rec(&self.name, location, &mut prefix, &mut keys);
        }
        keys
    }
}

fn descend<'a>(
    children: &'a mut Vec<InfrastructureLocation>,
    path: &[&str],
) -> &'a mut Vec<InfrastructureLocation> {
    match path.split_first() {
        None => children,
        Some((head, rest)) => {
            let idx = match children.iter().position(|loc| loc.name == *head) {
                Some(idx) => idx,
                None => {
                    children.push(InfrastructureLocation::new(*head));
                    children.len() - 1
                }
            };
            descend(&mut children[idx].locations, rest)
        }
    }
}

fn collect_keys_rec<'a>(
    vendor: &str,
    location: &'a InfrastructureLocation,
    prefix: &mut Vec<&'a str>,
    out: &mut Vec<LocationKey>,
) {
    prefix.push(&location.name);
    out.push(LocationKey::from_parts(vendor, prefix));
    for child in &location.locations {
        collect_keys_rec(vendor, child, prefix, out);
    }
    prefix.pop();
}
