use std::fmt;

use serde_json::Value;

use super::{ClaimSource, EntityJson, decode_header};
use crate::{
    EntityId, EntityKind, SchemaError,
    json::{array_field, as_object, entity_id_field, require_keys},
    property_map::fmt_list,
    terms::{DEFAULT_LANGUAGE, fmt_quoted, term},
};

/// A Wikidata lexeme: a word or phrase with its forms and senses.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    entity_id: EntityId,
    raw: Value,
}

impl Lexeme {
    const CONTEXT: &'static str = "lexeme";

    /// Decode a lexeme mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the input is not an object, lacks `id`,
    /// `type`, `lemmas`, `lexicalCategory`, `language`, `forms`, `senses` or
    /// `claims`, or its `type` is not `lexeme`.
    pub fn decode(json: Value) -> Result<Self, SchemaError> {
        let entity_id = decode_header(&json, EntityKind::Lexeme, "lexeme type")?;
        if let Some(object) = json.as_object() {
            require_keys(
                object,
                Self::CONTEXT,
                &[
                    "lemmas",
                    "lexicalCategory",
                    "language",
                    "forms",
                    "senses",
                    "claims",
                ],
            )?;
        }
        Ok(Self {
            entity_id,
            raw: json,
        })
    }

    /// Lexeme id, e.g. `L7`.
    #[must_use]
    pub const fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Always [`EntityKind::Lexeme`].
    #[must_use]
    pub const fn entity_type(&self) -> EntityKind {
        EntityKind::Lexeme
    }

    /// Lemma in `lang`, or `""` when there is none.
    #[must_use]
    pub fn lemma(&self, lang: &str) -> &str {
        term(self.raw.get("lemmas"), lang)
    }

    /// Item id of the lexeme's language, e.g. `Q1860`.
    #[must_use]
    pub fn language(&self) -> &str {
        self.raw
            .get("language")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Item id of the lexical category, e.g. `Q1084` (noun).
    #[must_use]
    pub fn lexical_category(&self) -> &str {
        self.raw
            .get("lexicalCategory")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Decode the lexeme's forms. Every call decodes afresh.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `forms` is not an array or a form is
    /// malformed.
    pub fn forms(&self) -> Result<Vec<Form>, SchemaError> {
        self.decode_list("forms", Form::decode)
    }

    /// Decode the lexeme's senses. Every call decodes afresh.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `senses` is not an array or a sense is
    /// malformed.
    pub fn senses(&self) -> Result<Vec<Sense>, SchemaError> {
        self.decode_list("senses", Sense::decode)
    }

    fn decode_list<T>(
        &self,
        key: &str,
        decode: fn(&Value) -> Result<T, SchemaError>,
    ) -> Result<Vec<T>, SchemaError> {
        let object = as_object(&self.raw, Self::CONTEXT)?;
        array_field(object, Self::CONTEXT, key)?
            .iter()
            .map(decode)
            .collect()
    }

    /// Consume the lexeme and return its source mapping.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.raw
    }
}

impl TryFrom<Value> for Lexeme {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::decode(value)
    }
}

impl EntityJson for Lexeme {
    fn as_json(&self) -> &Value {
        &self.raw
    }
}

impl ClaimSource for Lexeme {}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataLexeme(lemma={}, id={}, language={}, lexical_category={}, forms=",
            self.lemma(DEFAULT_LANGUAGE),
            self.entity_id,
            self.language(),
            self.lexical_category(),
        )?;
        match self.forms() {
            Ok(forms) => fmt_list(f, &forms)?,
            Err(_) => f.write_str("<invalid>")?,
        }
        f.write_str(", senses=")?;
        match self.senses() {
            Ok(senses) => fmt_list(f, &senses)?,
            Err(_) => f.write_str("<invalid>")?,
        }
        f.write_str(")")
    }
}

/// One inflected form of a lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    form_id: EntityId,
    grammatical_features: Vec<EntityId>,
    raw: Value,
}

impl Form {
    const CONTEXT: &'static str = "form";

    /// Decode a form mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `id`, `representations`,
    /// `grammaticalFeatures` or `claims` is missing, or when a grammatical
    /// feature is not a valid entity id.
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        let object = as_object(json, Self::CONTEXT)?;
        require_keys(
            object,
            Self::CONTEXT,
            &["id", "representations", "grammaticalFeatures", "claims"],
        )?;
        let form_id = entity_id_field(object, Self::CONTEXT)?;
        let grammatical_features = array_field(object, Self::CONTEXT, "grammaticalFeatures")?
            .iter()
            .map(|feature| {
                let raw = feature.as_str().ok_or_else(|| {
                    SchemaError::unexpected_type(
                        Self::CONTEXT,
                        "grammaticalFeatures",
                        "an array of strings",
                    )
                })?;
                EntityId::parse(raw).map_err(|source| SchemaError::InvalidId {
                    context: Self::CONTEXT,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            form_id,
            grammatical_features,
            raw: json.clone(),
        })
    }

    /// Form id, e.g. `L7-F1`.
    #[must_use]
    pub const fn form_id(&self) -> &EntityId {
        &self.form_id
    }

    /// Item ids of the grammatical features, e.g. plural or past tense.
    #[must_use]
    pub fn grammatical_features(&self) -> &[EntityId] {
        &self.grammatical_features
    }

    /// Representation in `lang`, or `""` when there is none.
    #[must_use]
    pub fn representation(&self, lang: &str) -> &str {
        term(self.raw.get("representations"), lang)
    }
}

impl EntityJson for Form {
    fn as_json(&self) -> &Value {
        &self.raw
    }
}

impl ClaimSource for Form {}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataForm(form_id={}, representation={}, grammatical_features=",
            self.form_id,
            self.representation(DEFAULT_LANGUAGE),
        )?;
        let features: Vec<&str> = self.grammatical_features.iter().map(EntityId::as_str).collect();
        fmt_quoted(f, &features)?;
        f.write_str(")")
    }
}

/// One meaning of a lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Sense {
    sense_id: EntityId,
    raw: Value,
}

impl Sense {
    const CONTEXT: &'static str = "sense";

    /// Decode a sense mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `id`, `glosses` or `claims` is missing.
    pub fn decode(json: &Value) -> Result<Self, SchemaError> {
        let object = as_object(json, Self::CONTEXT)?;
        require_keys(object, Self::CONTEXT, &["id", "glosses", "claims"])?;
        Ok(Self {
            sense_id: entity_id_field(object, Self::CONTEXT)?,
            raw: json.clone(),
        })
    }

    /// Sense id, e.g. `L7-S1`.
    #[must_use]
    pub const fn sense_id(&self) -> &EntityId {
        &self.sense_id
    }

    /// Gloss in `lang`, or `""` when there is none.
    #[must_use]
    pub fn gloss(&self, lang: &str) -> &str {
        term(self.raw.get("glosses"), lang)
    }
}

impl EntityJson for Sense {
    fn as_json(&self) -> &Value {
        &self.raw
    }
}

impl ClaimSource for Sense {}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WikidataSense(sense_id={}, gloss={})",
            self.sense_id,
            self.gloss(DEFAULT_LANGUAGE)
        )
    }
}
