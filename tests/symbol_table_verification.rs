//! Symbol Table Verification Tests
//! A walk callback may record identifiers into a table of its own.

use roxas::domain::{walk, AncestryStack, LeafValue, SymbolRecord, SymbolTable};
use roxas::infrastructure::parse_document;

#[test]
fn test_callback_fills_symbol_table() {
    let doc = parse_document(
        r#"{
            "node": "PROG", "root": "PROG",
            "left": [
                {"node": "AUTO", "root": "DECL", "left": [
                    {"node": "ID", "_meta": {"name": "x", "line": 2}},
                    {"node": "ID", "_meta": {"name": "y", "line": 2}}
                ]},
                {"node": "ASSIGN", "root": "STMT", "right": {"node": "ID", "_meta": {"name": "x", "line": 3}}}
            ]
        }"#,
    )
    .unwrap();

    let mut table: SymbolTable<SymbolRecord> = SymbolTable::new();
    let mut stack = AncestryStack::new();
    walk(
        &doc,
        &mut |leaf: LeafValue<'_>, ancestry: &AncestryStack<'_>| {
            let Some(meta) = leaf.as_object().and_then(|m| m.get("_meta")) else {
                return;
            };
            let name = meta["name"].as_str().unwrap_or_default().to_string();
            let line = meta["line"].as_u64().unwrap_or_default() as usize;
            let declaring = ancestry.top().and_then(|t| t.as_name()) == Some("AUTO");

            if declaring {
                table.set(
                    name,
                    SymbolRecord {
                        type_name: "auto".to_string(),
                        size: 8,
                        line_declared: line,
                        ..SymbolRecord::default()
                    },
                );
            } else if let Ok(record) = table.get_mut(&name) {
                record.line_used = Some(line);
            }
        },
        &mut stack,
    )
    .unwrap();

    assert_eq!(table.len(), 2);
    let x = table.get("x").unwrap();
    assert_eq!(x.line_declared, 2);
    assert_eq!(x.line_used, Some(3));
    assert_eq!(table.get("y").unwrap().line_used, None);
    assert!(table.get("z").is_err());
}
