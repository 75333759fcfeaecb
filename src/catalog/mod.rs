//! Drug catalogue data model
//!
//! The catalogue is the whole dataset, loaded once and never mutated for the
//! rest of the session. Drugs and subdrugs are addressed by position
//! ([`DrugKey`], [`SubdrugKey`]) rather than by name, so duplicate names in the
//! source data stay distinguishable.
//!
//! Subdrug records are open-ended: a closed set of recognised fields
//! ([`KnownField`]) plus an ordered list of anything else the data carries.

pub mod details;
pub mod filter;
pub mod selection;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shown wherever a value slot must be rendered but the value is blank
pub const PLACEHOLDER: &str = "—";

// ─────────────────────────────────────────────────────────────────────────────
// Field values
// ─────────────────────────────────────────────────────────────────────────────

/// A single subdrug field value: free text or a coverage flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Convert a raw JSON value. `null` means the field is absent.
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(flag) => Some(Self::Flag(flag)),
            Value::String(text) => Some(Self::Text(text)),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            Value::Array(items) => Some(Self::Text(
                items.iter().map(joined_element).collect::<Vec<_>>().join(","),
            )),
            other => Some(Self::Text(other.to_string())),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    /// Whether there is nothing to display. Flags are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Flag(_) => false,
        }
    }
}

/// Array elements print bare: strings unquoted, `null` as nothing
fn joined_element(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(joined_element).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Known fields
// ─────────────────────────────────────────────────────────────────────────────

/// Recognised subdrug fields, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownField {
    Name,
    KelasTerapi,
    SubKelasTerapi,
    SubSubKelasTerapi,
    KategoriAntibiotik,
    NamaObat,
    Sediaan,
    Kekuatan,
    Satuan,
    Fpktp,
    Fpktl,
    Pp,
    Prb,
    Oen,
    Kanker,
    Komposisi,
    Program,
    PeresepanMaksimal,
    RestriksiObat,
    KetentuanTambahan,
    BerkasLampiran,
    RestriksiKelasTerapi,
    RestriksiSubSubKelasTerapi,
    RestriksiSediaan,
    RestriksiSubKelasTerapi,
    Alias,
}

impl KnownField {
    /// Every recognised field in display order
    pub const ALL: [KnownField; 26] = [
        Self::Name,
        Self::KelasTerapi,
        Self::SubKelasTerapi,
        Self::SubSubKelasTerapi,
        Self::KategoriAntibiotik,
        Self::NamaObat,
        Self::Sediaan,
        Self::Kekuatan,
        Self::Satuan,
        Self::Fpktp,
        Self::Fpktl,
        Self::Pp,
        Self::Prb,
        Self::Oen,
        Self::Kanker,
        Self::Komposisi,
        Self::Program,
        Self::PeresepanMaksimal,
        Self::RestriksiObat,
        Self::KetentuanTambahan,
        Self::BerkasLampiran,
        Self::RestriksiKelasTerapi,
        Self::RestriksiSubSubKelasTerapi,
        Self::RestriksiSediaan,
        Self::RestriksiSubKelasTerapi,
        Self::Alias,
    ];

    /// JSON key as it appears in the dataset
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::KelasTerapi => "kelas terapi",
            Self::SubKelasTerapi => "sub kelas terapi",
            Self::SubSubKelasTerapi => "sub sub kelas terapi",
            Self::KategoriAntibiotik => "kategori antibiotik",
            Self::NamaObat => "nama obat",
            Self::Sediaan => "sediaan",
            Self::Kekuatan => "kekuatan",
            Self::Satuan => "satuan",
            Self::Fpktp => "fpktp",
            Self::Fpktl => "fpktl",
            Self::Pp => "pp",
            Self::Prb => "prb",
            Self::Oen => "oen",
            Self::Kanker => "kanker",
            Self::Komposisi => "komposisi",
            Self::Program => "program",
            Self::PeresepanMaksimal => "peresepan maksimal",
            Self::RestriksiObat => "restriksi obat",
            Self::KetentuanTambahan => "ketentuan tambahan",
            Self::BerkasLampiran => "berkas lampiran",
            Self::RestriksiKelasTerapi => "restriksi kelas terapi",
            Self::RestriksiSubSubKelasTerapi => "restriksi sub sub kelas terapi",
            Self::RestriksiSediaan => "restriksi sediaan",
            Self::RestriksiSubKelasTerapi => "restriksi sub kelas terapi",
            Self::Alias => "alias",
        }
    }

    /// Localized display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nama",
            Self::KelasTerapi => "Kelas Terapi",
            Self::SubKelasTerapi => "Sub Kelas Terapi",
            Self::SubSubKelasTerapi => "Sub Sub Kelas Terapi",
            Self::KategoriAntibiotik => "Kategori Antibiotik",
            Self::NamaObat => "Nama Obat",
            Self::Sediaan => "Sediaan",
            Self::Kekuatan => "Kekuatan",
            Self::Satuan => "Satuan Obat",
            Self::Fpktp => "FPKTP",
            Self::Fpktl => "FPKTL",
            Self::Pp => "PP",
            Self::Prb => "PRB",
            Self::Oen => "OEN",
            Self::Kanker => "Kanker",
            Self::Komposisi => "Komposisi",
            Self::Program => "Program",
            Self::PeresepanMaksimal => "Peresepan Maksimal",
            Self::RestriksiObat => "Restriksi Obat",
            Self::KetentuanTambahan => "Ketentuan Tambahan",
            Self::BerkasLampiran => "Berkas Lampiran",
            Self::RestriksiKelasTerapi => "Restriksi Kelas Terapi",
            Self::RestriksiSubSubKelasTerapi => "Restriksi Sub Sub Kelas Terapi",
            Self::RestriksiSediaan => "Restriksi Sediaan",
            Self::RestriksiSubKelasTerapi => "Restriksi Sub Kelas Terapi",
            Self::Alias => "Alias",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// A specific formulation/variant of a drug
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubDrug {
    /// Variant name; empty when the record had none
    pub name: String,
    /// Recognised fields other than `name`, keyed in display order
    known: BTreeMap<KnownField, FieldValue>,
    /// Unrecognised fields in first-encounter order
    extra: Vec<(String, FieldValue)>,
}

impl SubDrug {
    #[cfg(test)]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn with(mut self, key: &str, value: FieldValue) -> Self {
        self.insert(key.to_string(), value);
        self
    }

    fn insert(&mut self, key: String, value: FieldValue) {
        match KnownField::from_key(&key) {
            Some(KnownField::Name) => {
                self.name = match value {
                    FieldValue::Text(text) => text,
                    FieldValue::Flag(flag) => flag.to_string(),
                }
            }
            Some(field) => {
                self.known.insert(field, value);
            }
            None => match self.extra.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => self.extra.push((key, value)),
            },
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut subdrug = Self::default();
        for (key, value) in map {
            if let Some(value) = FieldValue::from_json(value) {
                subdrug.insert(key, value);
            }
        }
        subdrug
    }

    /// Value of a recognised field (`Name` included)
    #[cfg(test)]
    pub fn get(&self, field: KnownField) -> Option<FieldValue> {
        match field {
            KnownField::Name => Some(FieldValue::Text(self.name.clone())),
            other => self.known.get(&other).cloned(),
        }
    }

    /// Recognised fields other than `name`, in display order
    pub fn known_fields(&self) -> impl Iterator<Item = (KnownField, &FieldValue)> {
        self.known.iter().map(|(field, value)| (*field, value))
    }

    /// Unrecognised fields in first-encounter order
    pub fn extra_fields(&self) -> &[(String, FieldValue)] {
        &self.extra
    }

    /// Dosage form, when present and non-empty
    pub fn sediaan(&self) -> Option<&str> {
        self.known
            .get(&KnownField::Sediaan)
            .and_then(FieldValue::as_text)
            .filter(|text| !text.trim().is_empty())
    }

    /// Name for list display, falling back to the placeholder glyph
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            PLACEHOLDER
        } else {
            &self.name
        }
    }
}

impl<'de> Deserialize<'de> for SubDrug {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// A top-level catalogue entry with a name and its variants
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Drug {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subdrugs: Vec<SubDrug>,
}

#[cfg(test)]
impl Drug {
    pub fn new(name: impl Into<String>, subdrugs: Vec<SubDrug>) -> Self {
        Self {
            name: name.into(),
            subdrugs,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity keys
// ─────────────────────────────────────────────────────────────────────────────

/// Position of a drug in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrugKey(pub usize);

/// Position of a subdrug within its drug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubdrugKey {
    pub drug: DrugKey,
    pub index: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable dataset shared between the loader, filter and views
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    drugs: Arc<[Drug]>,
}

impl Catalog {
    pub fn new(drugs: Vec<Drug>) -> Self {
        Self {
            drugs: drugs.into(),
        }
    }

    /// Build from an already-parsed JSON document.
    ///
    /// Anything other than an array yields an empty catalogue. Array elements
    /// that are not drug records are skipped.
    pub fn from_json_value(value: Value) -> Self {
        let Value::Array(items) = value else {
            tracing::warn!("Dataset is not a JSON array, treating as empty");
            return Self::default();
        };

        let total = items.len();
        let drugs: Vec<Drug> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Drug>(item) {
                Ok(drug) => Some(drug),
                Err(e) => {
                    tracing::warn!("Skipping malformed drug record #{}: {}", index, e);
                    None
                }
            })
            .collect();

        if drugs.len() < total {
            tracing::warn!("Loaded {} of {} drug records", drugs.len(), total);
        }
        Self::new(drugs)
    }

    /// Parse raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_json_value(value))
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    pub fn drug(&self, key: DrugKey) -> Option<&Drug> {
        self.drugs.get(key.0)
    }

    pub fn subdrug(&self, key: SubdrugKey) -> Option<&SubDrug> {
        self.drug(key.drug)
            .and_then(|drug| drug.subdrugs.get(key.index))
    }

    /// First drug whose name matches case-insensitively
    pub fn find_by_name(&self, name: &str) -> Option<DrugKey> {
        let needle = filter::normalize(name);
        self.drugs
            .iter()
            .position(|drug| filter::normalize(&drug.name) == needle)
            .map(DrugKey)
    }
}
