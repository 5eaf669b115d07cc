//! Claim groups and truthy rank resolution.

use std::{fmt, ops::Deref};

use serde_json::Value;

use crate::{Claim, Datavalue, SchemaError, property_map::fmt_list};

/// An ordered sequence of claims about a single property.
///
/// Every member shares the same property id. An empty group has no property
/// id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimGroup {
    property_id: Option<String>,
    claims: Vec<Claim>,
}

impl ClaimGroup {
    /// An empty group.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            property_id: None,
            claims: Vec::new(),
        }
    }

    /// Build a group from decoded claims.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MixedPropertyIds`] when the claims refer to
    /// more than one property.
    pub fn from_claims(claims: Vec<Claim>) -> Result<Self, SchemaError> {
        let mut property_ids: Vec<String> = Vec::new();
        for claim in &claims {
            if !property_ids.iter().any(|seen| seen == claim.property_id()) {
                property_ids.push(claim.property_id().to_owned());
            }
        }
        if property_ids.len() > 1 {
            return Err(SchemaError::MixedPropertyIds { property_ids });
        }
        Ok(Self {
            property_id: property_ids.pop(),
            claims,
        })
    }

    /// Decode a JSON array of claim mappings.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the input is not an array, a claim fails
    /// to decode, or the claims mix property ids.
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        let list = json.as_array().ok_or(SchemaError::NotAnArray {
            context: "claim group",
        })?;
        let claims = list
            .iter()
            .map(Claim::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_claims(claims)
    }

    /// Number of claims in the group.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the group holds no claims.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Shared property id, or `None` for an empty group.
    #[must_use]
    pub fn property_id(&self) -> Option<&str> {
        self.property_id.as_deref()
    }

    /// The truthy subset of this group, in original order.
    ///
    /// When any claim is preferred, only preferred claims are truthy.
    /// Otherwise every claim that is not deprecated is truthy.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use wikigraph_core::ClaimGroup;
    ///
    /// let claim = |id: &str, rank: &str| json!({
    ///     "id": id, "type": "statement", "rank": rank,
    ///     "mainsnak": {"snaktype": "novalue", "property": "P1"},
    /// });
    /// let group = ClaimGroup::decode(&json!([
    ///     claim("a", "normal"),
    ///     claim("b", "deprecated"),
    /// ]))?;
    /// let truthy = group.truthy();
    /// assert_eq!(truthy.len(), 1);
    /// assert_eq!(truthy[0].claim_id(), "a");
    /// # Ok::<(), wikigraph_core::SchemaError>(())
    /// ```
    #[must_use]
    pub fn truthy(&self) -> Self {
        let preferred: Vec<Claim> = self
            .claims
            .iter()
            .filter(|claim| claim.rank().is_preferred())
            .cloned()
            .collect();
        let claims = if preferred.is_empty() {
            self.claims
                .iter()
                .filter(|claim| !claim.rank().is_deprecated())
                .cloned()
                .collect()
        } else {
            preferred
        };
        Self {
            property_id: if claims.is_empty() {
                None
            } else {
                self.property_id.clone()
            },
            claims,
        }
    }

    /// Entity ids referenced by the main snaks of this group.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.claims
            .iter()
            .filter_map(|claim| claim.mainsnak().datavalue().and_then(Datavalue::entity_id))
    }

    /// Report whether any main snak references `entity_id`.
    #[must_use]
    pub fn references_entity(&self, entity_id: &str) -> bool {
        self.entity_ids().any(|id| id == entity_id)
    }

    /// Consume the group and return its claims.
    #[must_use]
    pub fn into_claims(self) -> Vec<Claim> {
        self.claims
    }
}

impl Deref for ClaimGroup {
    type Target = [Claim];

    fn deref(&self) -> &Self::Target {
        &self.claims
    }
}

impl<'a> IntoIterator for &'a ClaimGroup {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

impl fmt::Display for ClaimGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataClaimGroup(property_id={}, claims=",
            self.property_id().unwrap_or("None")
        )?;
        fmt_list(f, &self.claims)?;
        f.write_str(")")
    }
}
