//! End-to-end conversion checks: description JSON in, declaration text out.

use serde_json::{Value, json};

use schema2ts::{Describe, Settings, convert_schema};

fn describe(v: Value) -> Describe {
    serde_json::from_value(v).unwrap()
}

fn convert(settings: &Settings, v: Value) -> schema2ts::ConvertedType {
    convert_schema(settings, &describe(v), None)
        .unwrap()
        .unwrap()
}

#[test]
fn object_members_keep_source_order_and_optional_markers() {
    let settings = Settings {
        sort_properties_by_name: false,
        ..Settings::default()
    };
    let converted = convert(
        &settings,
        json!({
            "type": "object",
            "metas": [{ "className": "T" }],
            "keys": {
                "name": { "type": "string", "flags": { "presence": "optional" } },
                "flag": { "type": "boolean", "flags": { "presence": "required" } }
            }
        }),
    );
    assert_eq!(
        converted.content,
        "export interface T {\n  name?: string;\n  flag: boolean;\n}"
    );
}

#[test]
fn sorted_members_when_enabled() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "object",
            "metas": [{ "className": "T" }],
            "keys": {
                "zeta": { "type": "string" },
                "alpha": { "type": "number" }
            }
        }),
    );
    assert_eq!(
        converted.content,
        "export interface T {\n  alpha?: number;\n  zeta?: string;\n}"
    );
}

#[test]
fn named_item_arrays_reference_the_item_declaration() {
    let item = json!({
        "type": "object",
        "metas": [{ "className": "Item" }],
        "keys": {
            "name": { "type": "string", "flags": { "presence": "required" } }
        }
    });

    let item_declaration = convert(&Settings::default(), item.clone());
    assert_eq!(
        item_declaration.content,
        "export interface Item {\n  name: string;\n}"
    );

    let list = convert(
        &Settings::default(),
        json!({
            "type": "array",
            "metas": [{ "className": "List" }],
            "items": [item]
        }),
    );
    assert_eq!(list.content, "export type List = Item[];");
    assert_eq!(list.custom_types, ["Item"]);
}

#[test]
fn generic_and_exact_empty_objects_stay_distinct() {
    let generic = convert(
        &Settings::default(),
        json!({ "type": "object", "metas": [{ "className": "Anything" }] }),
    );
    let exact = convert(
        &Settings::default(),
        json!({ "type": "object", "metas": [{ "className": "Nothing" }], "keys": {} }),
    );
    assert_eq!(generic.content, "export type Anything = object;");
    assert_eq!(exact.content, "export interface Nothing {}");
    assert_ne!(generic.content.replace("Anything", "N"), exact.content.replace("Nothing", "N"));
}

#[test]
fn readonly_applies_to_members_but_not_declarations() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "object",
            "metas": [{ "className": "T" }, { "readonly": true }],
            "keys": {
                "id": {
                    "type": "number",
                    "flags": { "presence": "required" },
                    "metas": [{ "readonly": true }]
                }
            }
        }),
    );
    assert_eq!(
        converted.content,
        "export interface T {\n  readonly id: number;\n}"
    );
}

#[test]
fn allow_lists_union_literals_with_the_base_type() {
    let open = convert(
        &Settings::default(),
        json!({
            "type": "string",
            "metas": [{ "className": "Color" }],
            "allow": ["red", "green", "blue"]
        }),
    );
    assert_eq!(
        open.content,
        "export type Color = 'red' | 'green' | 'blue' | string;"
    );

    let strict = convert(
        &Settings::default(),
        json!({
            "type": "string",
            "metas": [{ "className": "Color" }],
            "flags": { "only": true },
            "allow": ["red", "green", "blue"]
        }),
    );
    assert_eq!(strict.content, "export type Color = 'red' | 'green' | 'blue';");
}

#[test]
fn nullable_strings_lead_with_the_base_type() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "string",
            "metas": [{ "className": "Name" }],
            "allow": [null, ""]
        }),
    );
    assert_eq!(converted.content, "export type Name = string | null | '';");
}

#[test]
fn sparse_arrays_union_undefined_into_the_item() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "array",
            "metas": [{ "className": "Holes" }],
            "flags": { "sparse": true },
            "items": [{ "type": "string" }]
        }),
    );
    assert_eq!(converted.content, "export type Holes = (string | undefined)[];");
}

#[test]
fn positional_arrays_become_tuples() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "array",
            "metas": [{ "className": "Pair" }],
            "ordered": [
                { "type": "number", "flags": { "presence": "required" } },
                { "type": "string" }
            ]
        }),
    );
    assert_eq!(converted.content, "export type Pair = [number, string?];");
}

#[test]
fn alternatives_become_unions() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "alternatives",
            "metas": [{ "className": "Either" }],
            "matches": [
                { "schema": { "type": "string" } },
                { "schema": { "type": "number" } }
            ]
        }),
    );
    assert_eq!(converted.content, "export type Either = string | number;");
}

#[test]
fn unknown_keys_add_a_documented_index_signature() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "object",
            "metas": [{ "className": "Open" }],
            "flags": { "unknown": true },
            "keys": {
                "name": { "type": "string" }
            }
        }),
    );
    assert_eq!(
        converted.content,
        "export interface Open {\n  /**\n   * Unknown Property\n   */\n  [x: string]: any;\n  name?: string;\n}"
    );
}

#[test]
fn pattern_rules_become_index_signatures() {
    let converted = convert_schema(
        &Settings::default(),
        &describe(json!({
            "type": "object",
            "flags": { "description": "a test deep pattern schema definition" },
            "patterns": [{
                "schema": { "type": "string" },
                "rule": { "type": "number", "flags": { "description": "Number Property" } }
            }]
        })),
        Some("TestSchema"),
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        converted.content,
        "/**\n * a test deep pattern schema definition\n */\nexport interface TestSchema {\n  /**\n   * Number Property\n   */\n  [pattern: string]: number;\n}"
    );
}

#[test]
fn pattern_rules_carry_structured_value_types() {
    let converted = convert_schema(
        &Settings::default(),
        &describe(json!({
            "type": "object",
            "flags": { "description": "a test pattern schema definition" },
            "patterns": [{
                "schema": { "type": "string" },
                "rule": {
                    "type": "array",
                    "items": [{
                        "type": "object",
                        "keys": {
                            "id": { "type": "string", "flags": { "presence": "required" } },
                            "propertyName1": { "type": "boolean", "flags": { "presence": "required" } }
                        }
                    }]
                }
            }]
        })),
        Some("TestSchema"),
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        converted.content,
        "/**\n * a test pattern schema definition\n */\nexport interface TestSchema {\n  [pattern: string]: {\n    id: string;\n    propertyName1: boolean;\n  }[];\n}"
    );
}

#[test]
fn pattern_rules_take_precedence_over_unknown_keys() {
    let converted = convert_schema(
        &Settings::default(),
        &describe(json!({
            "type": "object",
            "flags": { "unknown": true },
            "patterns": [{
                "schema": { "type": "string" },
                "rule": { "type": "number" }
            }]
        })),
        Some("OpenSchema"),
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        converted.content,
        "export interface OpenSchema {\n  [pattern: string]: number;\n}"
    );
    assert_eq!(converted.content.matches("string]:").count(), 1);
}

#[test]
fn forbidden_members_render_as_undefined() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "object",
            "metas": [{ "className": "T" }],
            "keys": {
                "gone": { "type": "boolean", "flags": { "presence": "forbidden" } }
            }
        }),
    );
    assert_eq!(converted.content, "export interface T {\n  gone?: undefined;\n}");
    assert!(converted.custom_types.is_empty());
}

#[test]
fn descriptions_render_as_doc_blocks() {
    let converted = convert(
        &Settings::default(),
        json!({
            "type": "object",
            "metas": [{ "className": "T" }],
            "flags": { "description": "A thing." },
            "keys": {
                "name": {
                    "type": "string",
                    "flags": { "description": "Its name." },
                    "examples": ["Fido"]
                }
            }
        }),
    );
    assert_eq!(
        converted.content,
        "/**\n * A thing.\n */\nexport interface T {\n  /**\n   * Its name.\n   * @example Fido\n   */\n  name?: string;\n}"
    );
}

#[test]
fn supplied_defaults_lead_member_unions() {
    let settings = Settings {
        supply_defaults_in_type: true,
        ..Settings::default()
    };
    let converted = convert(
        &settings,
        json!({
            "type": "object",
            "metas": [{ "className": "T" }],
            "keys": {
                "level": { "type": "number", "flags": { "default": 3 } }
            }
        }),
    );
    assert_eq!(converted.content, "export interface T {\n  level?: 3 | number;\n}");
}

#[test]
fn conversion_is_deterministic() {
    let schema = json!({
        "type": "object",
        "metas": [{ "className": "Deep" }],
        "keys": {
            "list": {
                "type": "array",
                "items": [{
                    "type": "alternatives",
                    "matches": [
                        { "schema": { "type": "string", "allow": ["a", "b"] } },
                        { "schema": { "type": "object", "metas": [{ "className": "Leafy" }], "keys": {} } }
                    ]
                }]
            },
            "tag": { "type": "string", "flags": { "presence": "required" } }
        }
    });
    let first = convert(&Settings::default(), schema.clone());
    let second = convert(&Settings::default(), schema);
    assert_eq!(first.content, second.content);
    assert_eq!(first.custom_types, second.custom_types);
}

#[test]
fn labels_name_declarations_when_configured() {
    let settings = Settings {
        use_label_as_name: true,
        ..Settings::default()
    };
    let converted = convert(
        &settings,
        json!({
            "type": "string",
            "flags": { "label": "Named" },
            "metas": [{ "className": "Ignored" }]
        }),
    );
    assert_eq!(converted.name, "Named");
}
