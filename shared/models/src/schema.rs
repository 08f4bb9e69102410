//! Per-entity schema descriptors shared by the ETL sink and the graph
//! loader. The column order declared here is the artifact format
//! contract: the sink writes headers from it and the loader reads by it.

/// How a column's value is typed once it reaches the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    /// Semicolon-joined in the artifact, split into a list property at
    /// load time.
    TextList,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Text,
    }
}

/// Describes one node entity type: its graph label, artifact name, and
/// column set. The first column is always the upsert key.
#[derive(Debug, Clone, Copy)]
pub struct NodeSchema {
    pub label: &'static str,
    pub artifact: &'static str,
    pub key: &'static str,
    pub columns: &'static [Column],
}

/// Describes one directed relationship type between a Disease and one
/// other node type.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipSchema {
    pub rel_type: &'static str,
    pub artifact: &'static str,
    pub from_label: &'static str,
    pub to_label: &'static str,
    pub from_key: &'static str,
    pub to_key: &'static str,
    pub attr_columns: &'static [Column],
}

pub const SYMPTOM: NodeSchema = NodeSchema {
    label: "Symptom",
    artifact: "symptoms",
    key: "symptom_id",
    columns: &[
        text("symptom_id"),
        text("name"),
        text("description"),
        text("body_site"),
        text("commonness"),
    ],
};

pub const CURE: NodeSchema = NodeSchema {
    label: "Cure",
    artifact: "cures",
    key: "cure_id",
    columns: &[
        text("cure_id"),
        text("name"),
        text("description"),
        text("type"),
    ],
};

pub const MEDICINE: NodeSchema = NodeSchema {
    label: "Medicine",
    artifact: "medicines",
    key: "medicine_id",
    columns: &[
        text("medicine_id"),
        text("name"),
        text("description"),
        text("drug_class"),
        text("dosage_form"),
    ],
};

pub const PRECAUTION: NodeSchema = NodeSchema {
    label: "Precaution",
    artifact: "precautions",
    key: "precaution_id",
    columns: &[text("precaution_id"), text("name"), text("description")],
};

pub const DISEASE: NodeSchema = NodeSchema {
    label: "Disease",
    artifact: "diseases",
    key: "disease_id",
    columns: &[
        text("disease_id"),
        text("name"),
        text("canonical_id"),
        text("description"),
        text("prevalence"),
        Column {
            name: "risk_factors",
            kind: ColumnKind::TextList,
        },
    ],
};

pub const HAS_SYMPTOM: RelationshipSchema = RelationshipSchema {
    rel_type: "HAS_SYMPTOM",
    artifact: "disease_has_symptom",
    from_label: "Disease",
    to_label: "Symptom",
    from_key: "disease_id",
    to_key: "symptom_id",
    attr_columns: &[Column {
        name: "weight",
        kind: ColumnKind::Number,
    }],
};

pub const CURED_BY: RelationshipSchema = RelationshipSchema {
    rel_type: "CURED_BY",
    artifact: "disease_has_cure",
    from_label: "Disease",
    to_label: "Cure",
    from_key: "disease_id",
    to_key: "cure_id",
    attr_columns: &[],
};

pub const TREATED_WITH: RelationshipSchema = RelationshipSchema {
    rel_type: "TREATED_WITH",
    artifact: "disease_has_medicine",
    from_label: "Disease",
    to_label: "Medicine",
    from_key: "disease_id",
    to_key: "medicine_id",
    attr_columns: &[],
};

pub const REQUIRES_PRECAUTION: RelationshipSchema = RelationshipSchema {
    rel_type: "REQUIRES_PRECAUTION",
    artifact: "disease_has_precaution",
    from_label: "Disease",
    to_label: "Precaution",
    from_key: "disease_id",
    to_key: "precaution_id",
    attr_columns: &[],
};

/// All node types, loaded before any relationship type.
pub const NODE_SCHEMAS: [&NodeSchema; 5] = [&SYMPTOM, &CURE, &MEDICINE, &PRECAUTION, &DISEASE];

/// All relationship types, loaded after every node type.
pub const RELATIONSHIP_SCHEMAS: [&RelationshipSchema; 4] =
    [&HAS_SYMPTOM, &CURED_BY, &TREATED_WITH, &REQUIRES_PRECAUTION];

impl NodeSchema {
    /// Header row for this entity's artifact.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

impl RelationshipSchema {
    /// Header row for this relationship's artifact: the two endpoint id
    /// columns followed by any relationship attributes.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec![self.from_key, self.to_key];
        names.extend(self.attr_columns.iter().map(|c| c.name));
        names
    }
}
