use std::marker::PhantomData;

use dynmsg_core::schema::{FieldType, Schema};
use dynmsg_core::{CoreConfig, Gateway, MessageContract, Record, RecordError, TypeRegistry};

#[derive(MessageContract)]
#[contract(name = "Contracts.Address")]
pub struct Address {
    record: Record,

    #[contract(field = "city")]
    city: PhantomData<String>,

    #[contract(field = "zip")]
    zip: PhantomData<i64>,
}

#[derive(MessageContract)]
#[contract(name = "Contracts.OrderPlaced")]
pub struct OrderPlaced {
    record: Record,

    #[contract(field = "order_id", readonly)]
    order_id: PhantomData<String>,

    #[contract(field = "quantity")]
    quantity: PhantomData<i64>,

    #[contract(field = "price")]
    price: PhantomData<f64>,

    #[contract(field = "gift")]
    gift: PhantomData<bool>,

    #[contract(field = "payload")]
    payload: PhantomData<Vec<u8>>,

    #[contract(field = "shipping", record = "Contracts.Address")]
    shipping: PhantomData<Option<Record>>,

    // Not part of the contract
    retries: u32,
}

#[test]
fn test_generated_constants() {
    assert_eq!(OrderPlaced::CONTRACT_NAME, "Contracts.OrderPlaced");
    assert_eq!(OrderPlaced::QUANTITY_FIELD, "quantity");
    assert_eq!(Address::CITY_FIELD, "city");
}

#[test]
fn test_schema_in_declaration_order() {
    let schema = OrderPlaced::schema();
    let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["order_id", "quantity", "price", "gift", "payload", "shipping"]
    );
    assert_eq!(
        schema.field("shipping").map(|f| &f.kind),
        Some(&FieldType::record("Contracts.Address"))
    );
}

#[test]
fn test_typed_access() {
    let registry = TypeRegistry::new();
    Address::record_type(&registry).unwrap();

    let mut order = OrderPlaced::create(&registry).unwrap();
    assert_eq!(order.quantity().unwrap(), 0);
    assert_eq!(order.order_id().unwrap(), "");
    assert!(order.shipping().unwrap().is_none());

    order.set_quantity(3).unwrap();
    order.set_price(12.5).unwrap();
    order.set_gift(true).unwrap();
    order.set_payload(vec![1, 2, 3]).unwrap();

    let mut address = Address::create(&registry).unwrap();
    address.set_city("Lisbon".to_string()).unwrap();
    address.set_zip(1000).unwrap();
    order.set_shipping(Some(address.into_record())).unwrap();

    assert_eq!(order.quantity().unwrap(), 3);
    assert_eq!(order.price().unwrap(), 12.5);
    assert!(order.gift().unwrap());
    assert_eq!(order.payload().unwrap(), vec![1, 2, 3]);

    let shipping = Address::from_record(order.shipping().unwrap().unwrap()).unwrap();
    assert_eq!(shipping.city().unwrap(), "Lisbon");
    assert_eq!(order.retries, 0);
}

#[test]
fn test_readonly_through_record() {
    let registry = TypeRegistry::new();
    Address::record_type(&registry).unwrap();

    // No setter is generated; the untyped record stays writable
    let order = OrderPlaced::create(&registry).unwrap();
    let mut record = order.into_record();
    record.set(OrderPlaced::ORDER_ID_FIELD, "A-9").unwrap();

    let order = OrderPlaced::from_record(record).unwrap();
    assert_eq!(order.order_id().unwrap(), "A-9");
}

#[test]
fn test_typed_and_untyped_share_type() {
    let registry = TypeRegistry::new();
    let typed = Address::record_type(&registry).unwrap();
    let untyped = registry.lookup("Contracts.Address").unwrap();
    assert!(dynmsg_core::RecordType::same(&typed, &untyped));

    let record = untyped.new_instance();
    assert!(Address::from_record(record).is_ok());
}

#[test]
fn test_from_record_rejects_other_types() {
    let registry = TypeRegistry::new();
    let other = registry
        .synthesize(&Schema::builder("Contracts.Refund").integer("amount").build())
        .unwrap();

    assert!(matches!(
        Address::from_record(other.new_instance()),
        Err(RecordError::ForeignInstance { .. })
    ));
}

#[test]
fn test_from_record_rejects_mismatched_layout() {
    let registry = TypeRegistry::new();

    // Same name, declared by someone else with a different layout
    let missing_zip = registry
        .synthesize(&Schema::builder("Contracts.Address").text("city").build())
        .unwrap();
    assert_eq!(
        Address::from_record(missing_zip.new_instance()).err(),
        Some(RecordError::UnknownField {
            record_type: "Contracts.Address".to_string(),
            field: "zip".to_string(),
        })
    );

    let other = TypeRegistry::new();
    let wrong_kind = other
        .synthesize(
            &Schema::builder("Contracts.Address")
                .text("city")
                .text("zip")
                .build(),
        )
        .unwrap();
    assert!(matches!(
        Address::from_record(wrong_kind.new_instance()),
        Err(RecordError::TypeMismatch { .. })
    ));
}

#[test]
fn test_nested_contract_needs_target_type() {
    let registry = TypeRegistry::new();
    assert!(OrderPlaced::create(&registry).is_err());
    assert!(registry.lookup("Contracts.OrderPlaced").is_none());
}

#[test]
fn test_gateway_register_and_create() {
    let gateway = Gateway::new(CoreConfig::default());
    let address = gateway.register::<Address>().unwrap();
    assert!(gateway.message_type("Contracts.Address").is_some());
    assert_eq!(address.len(), 2);

    let mut order = gateway.create::<OrderPlaced>().unwrap();
    order.set_quantity(2).unwrap();
    assert_eq!(
        dynmsg_core::json::to_json(order.record())["quantity"],
        serde_json::json!(2)
    );
}
