//! Static entity registry.
//!
//! Each managed collection of the association site is described once here:
//! route slug, table, permission prefix, write schema, searchable text
//! fields and the sort allow-list. The generic resource service and the
//! router consume these definitions instead of per-entity controllers.

pub mod fields;

pub use fields::{FieldKind, FieldSpec, WriteMode};

use crate::policy::Action;

pub struct EntityDef {
    /// URL segment under /v1/
    pub slug: &'static str,
    pub table: &'static str,
    /// Permission names are `{prefix}_{listar,ver,crear,editar,eliminar}`
    pub permission_prefix: &'static str,
    /// Display label used in success messages
    pub label: &'static str,
    /// Spanish labels need gendered participles (creado / creada)
    pub feminine: bool,
    /// Whether GET /v1/{slug}/all is open, public reference data.
    /// Review per entity before flipping to true for new entities.
    pub public_all: bool,
    pub fields: &'static [FieldSpec],
    pub searchable: &'static [&'static str],
    pub sortable: &'static [&'static str],
}

impl EntityDef {
    pub fn permission(&self, action: Action) -> String {
        format!("{}_{}", self.permission_prefix, action.suffix())
    }

    /// Sort field resolution: unknown or missing fields fall back to `id`
    /// so arbitrary column names never reach the storage layer.
    pub fn sort_field(&self, requested: Option<&str>) -> &'static str {
        requested
            .and_then(|name| self.sortable.iter().find(|f| **f == name).copied())
            .unwrap_or("id")
    }

    pub fn created_message(&self) -> String {
        format!("{} {} Satisfactoriamente", self.label, self.participle("cread"))
    }

    pub fn updated_message(&self) -> String {
        format!(
            "{} {} Satisfactoriamente",
            self.label,
            self.participle("actualizad")
        )
    }

    pub fn deleted_message(&self) -> String {
        format!(
            "{} {} Satisfactoriamente",
            self.label,
            self.participle("eliminad")
        )
    }

    fn participle(&self, stem: &str) -> String {
        format!("{}{}", stem, if self.feminine { "a" } else { "o" })
    }
}

pub static BANNERS: EntityDef = EntityDef {
    slug: "banners",
    table: "banners",
    permission_prefix: "banner",
    label: "Banner",
    feminine: false,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "title",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(100),
        },
        FieldSpec {
            name: "subtitle",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(2000),
        },
        FieldSpec {
            name: "image",
            required: false,
            kind: FieldKind::Text,
            max_len: None,
        },
    ],
    searchable: &["title", "subtitle"],
    sortable: &["id", "title"],
};

pub static AGREEMENTS: EntityDef = EntityDef {
    slug: "agreements",
    table: "agreements",
    permission_prefix: "acuerdo",
    label: "Acuerdo",
    feminine: false,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "name",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "description",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(2000),
        },
        FieldSpec {
            name: "photo",
            required: true,
            kind: FieldKind::Text,
            max_len: None,
        },
    ],
    searchable: &["name", "description"],
    sortable: &["id", "name"],
};

pub static ANNOUNCEMENTS: EntityDef = EntityDef {
    slug: "announcements",
    table: "announcements",
    permission_prefix: "anuncio",
    label: "Anuncio",
    feminine: false,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "title",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "description",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(5000),
        },
        FieldSpec {
            name: "date",
            required: false,
            kind: FieldKind::Date,
            max_len: None,
        },
        FieldSpec {
            name: "image",
            required: false,
            kind: FieldKind::Text,
            max_len: None,
        },
    ],
    searchable: &["title", "description"],
    sortable: &["id", "title", "date"],
};

pub static COURSES: EntityDef = EntityDef {
    slug: "courses",
    table: "courses",
    permission_prefix: "curso",
    label: "Curso",
    feminine: false,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "name",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "description",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(5000),
        },
        FieldSpec {
            name: "date",
            required: false,
            kind: FieldKind::Date,
            max_len: None,
        },
        FieldSpec {
            name: "link",
            required: false,
            kind: FieldKind::Url,
            max_len: None,
        },
    ],
    searchable: &["name", "description"],
    sortable: &["id", "name", "date"],
};

pub static EVENTS: EntityDef = EntityDef {
    slug: "events",
    table: "events",
    permission_prefix: "evento",
    label: "Evento",
    feminine: false,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "name",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "description",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(5000),
        },
        FieldSpec {
            name: "place",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "date",
            required: false,
            kind: FieldKind::Date,
            max_len: None,
        },
    ],
    searchable: &["name", "description", "place"],
    sortable: &["id", "name", "date"],
};

pub static FAQS: EntityDef = EntityDef {
    slug: "faqs",
    table: "faqs",
    permission_prefix: "pregunta",
    label: "Pregunta",
    feminine: true,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "question",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(500),
        },
        FieldSpec {
            name: "answer",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(5000),
        },
    ],
    searchable: &["question", "answer"],
    sortable: &["id", "question"],
};

pub static CONTACTS: EntityDef = EntityDef {
    slug: "contacts",
    table: "contacts",
    permission_prefix: "contacto",
    label: "Contacto",
    feminine: false,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "name",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "position",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "phone",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(30),
        },
        FieldSpec {
            name: "email",
            required: false,
            kind: FieldKind::Email,
            max_len: None,
        },
    ],
    searchable: &["name", "position"],
    sortable: &["id", "name"],
};

pub static HISTORIES: EntityDef = EntityDef {
    slug: "histories",
    table: "histories",
    permission_prefix: "historia",
    label: "Historia",
    feminine: true,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "title",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "description",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(10000),
        },
        FieldSpec {
            name: "year",
            required: false,
            kind: FieldKind::Text,
            max_len: Some(10),
        },
    ],
    searchable: &["title", "description"],
    sortable: &["id", "title", "year"],
};

pub static AFFILIATES: EntityDef = EntityDef {
    slug: "affiliates",
    table: "affiliates",
    permission_prefix: "afiliado",
    label: "Afiliado",
    feminine: false,
    public_all: true,
    fields: &[
        FieldSpec {
            name: "name",
            required: true,
            kind: FieldKind::Text,
            max_len: Some(150),
        },
        FieldSpec {
            name: "website",
            required: false,
            kind: FieldKind::Url,
            max_len: None,
        },
        FieldSpec {
            name: "logo",
            required: false,
            kind: FieldKind::Text,
            max_len: None,
        },
    ],
    searchable: &["name"],
    sortable: &["id", "name"],
};

pub static ENTITIES: &[&EntityDef] = &[
    &BANNERS,
    &AGREEMENTS,
    &ANNOUNCEMENTS,
    &COURSES,
    &EVENTS,
    &FAQS,
    &CONTACTS,
    &HISTORIES,
    &AFFILIATES,
];

pub fn resolve(slug: &str) -> Option<&'static EntityDef> {
    ENTITIES.iter().find(|def| def.slug == slug).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_safe_ident(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    #[test]
    fn resolves_known_slugs() {
        assert_eq!(resolve("banners").unwrap().table, "banners");
        assert!(resolve("payrolls").is_none());
    }

    #[test]
    fn permission_names_match_gate_format() {
        assert_eq!(BANNERS.permission(Action::List), "banner_listar");
        assert_eq!(AGREEMENTS.permission(Action::View), "acuerdo_ver");
        assert_eq!(AGREEMENTS.permission(Action::Delete), "acuerdo_eliminar");
    }

    #[test]
    fn success_messages_agree_in_gender() {
        assert_eq!(
            AGREEMENTS.created_message(),
            "Acuerdo creado Satisfactoriamente"
        );
        assert_eq!(
            FAQS.created_message(),
            "Pregunta creada Satisfactoriamente"
        );
        assert_eq!(
            HISTORIES.updated_message(),
            "Historia actualizada Satisfactoriamente"
        );
    }

    #[test]
    fn sort_field_falls_back_to_id() {
        assert_eq!(BANNERS.sort_field(Some("title")), "title");
        assert_eq!(BANNERS.sort_field(Some("created_at")), "id");
        assert_eq!(BANNERS.sort_field(Some("'; DROP TABLE banners--")), "id");
        assert_eq!(BANNERS.sort_field(None), "id");
    }

    #[test]
    fn all_identifiers_are_storage_safe() {
        for def in ENTITIES {
            assert!(is_safe_ident(def.table), "table {}", def.table);
            for field in def.fields {
                assert!(is_safe_ident(field.name), "field {}", field.name);
            }
            for name in def.searchable {
                assert!(def.fields.iter().any(|f| f.name == *name));
            }
            for name in def.sortable.iter().filter(|n| **n != "id") {
                assert!(def.fields.iter().any(|f| f.name == *name));
            }
            assert!(def.sortable.contains(&"id"));
        }
    }
}
