use shopforge_core::{Catalog, Category, Money, Product};

#[test]
fn serializes_catalog_table_deterministically() {
    let catalog = Catalog::ecommerce();
    let products = catalog.table("products").expect("products table");

    let json = serde_json::to_string_pretty(&products.constraints).expect("serialize constraints");
    let expected = r#"[
  {
    "kind": "primary_key",
    "columns": [
      "product_id"
    ]
  }
]"#;
    assert_eq!(json, expected);
}

#[test]
fn product_row_serializes_as_csv_text() {
    let product = Product {
        product_id: 7,
        product_name: "Customizable 24/7 archive".to_string(),
        category: Category::Outdoors,
        price: Money::from_cents(12_050),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(&product).expect("serialize row");
    let bytes = writer.into_inner().expect("flush writer");
    let text = String::from_utf8(bytes).expect("utf8");

    assert_eq!(
        text,
        "product_id,product_name,category,price\n7,Customizable 24/7 archive,Outdoors,120.50\n"
    );

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let reloaded: Product = reader
        .deserialize()
        .next()
        .expect("one row")
        .expect("deserialize row");
    assert_eq!(reloaded, product);
}
