//! Screen flows of `ProductsPage`: editor, confirmation and notifications.

mod common;

use common::{service, ScriptedTransport, KEYBOARD_CREATED, MOUSE_LIST, TWO_PRODUCTS};
use product_core::{
    EditorMode, FetchOutcome, Field, NotificationLevel, Overlay, ProductId, ProductsPage,
    SubmitOutcome,
};

fn mounted(list: &str) -> ProductsPage<ScriptedTransport> {
    let service = service();
    service.transport().respond(200, list);
    let mut page = ProductsPage::new(service);
    assert!(matches!(page.mount(), FetchOutcome::Applied(_)));
    page
}

fn fill_keyboard(page: &mut ProductsPage<ScriptedTransport>) {
    let form = page.editor_mut().unwrap();
    form.set(Field::Name, "Keyboard");
    form.set(Field::Description, "Mechanical keyboard");
    form.set(Field::Price, "150");
    form.set(Field::Category, "Peripherals");
}

#[test]
fn mount_loads_and_settles_idle() {
    let page = mounted(MOUSE_LIST);
    assert_eq!(page.products().len(), 1);
    assert!(!page.is_loading());
    assert_eq!(page.overlay(), Overlay::None);
    assert!(page.notifications().is_empty());
}

#[test]
fn failed_mount_notifies_and_settles_idle() {
    let service = service();
    service.transport().fail("connection refused");
    let mut page = ProductsPage::new(service);

    assert!(matches!(page.mount(), FetchOutcome::Failed(_)));
    assert!(!page.is_loading());
    let notifications = page.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert!(page.notifications().is_empty());
}

#[test]
fn create_flow_closes_editor_and_appends() {
    let mut page = mounted(MOUSE_LIST);
    page.open_create();
    assert_eq!(page.overlay(), Overlay::Editor(EditorMode::Create));
    fill_keyboard(&mut page);

    page_transport(&page).respond(201, KEYBOARD_CREATED);
    let outcome = page.submit_editor();

    let SubmitOutcome::Saved(product) = outcome else {
        panic!("expected a saved product, got {outcome:?}");
    };
    assert_eq!(product.id, ProductId::from("2"));
    assert_eq!(page.overlay(), Overlay::None);
    assert_eq!(page.products().len(), 2);
    let notifications = page.take_notifications();
    assert_eq!(notifications[0].level, NotificationLevel::Success);
    assert_eq!(notifications[0].title, "Product created");
}

#[test]
fn invalid_draft_never_reaches_the_network() {
    let mut page = mounted(MOUSE_LIST);
    page.open_create();
    fill_keyboard(&mut page);
    page.editor_mut().unwrap().set(Field::Name, "Ke");
    let sent_before = page_transport(&page).request_count();

    let outcome = page.submit_editor();

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors, got {outcome:?}");
    };
    assert!(errors.get(Field::Name).is_some());
    assert_eq!(page_transport(&page).request_count(), sent_before);
    assert_eq!(page.overlay(), Overlay::Editor(EditorMode::Create));
    assert!(page.editor().unwrap().message(Field::Name).is_some());
}

#[test]
fn rejected_save_keeps_editor_open_with_field_messages() {
    let mut page = mounted(MOUSE_LIST);
    page.open_create();
    fill_keyboard(&mut page);
    page_transport(&page).respond(
        422,
        r#"{"message":"The given data was invalid.","errors":{"name":["The name has already been taken."]}}"#,
    );

    let outcome = page.submit_editor();

    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert_eq!(page.overlay(), Overlay::Editor(EditorMode::Create));
    assert_eq!(page.products().len(), 1);
    let notifications = page.take_notifications();
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].messages, ["The name has already been taken."]);
}

#[test]
fn unstructured_rejection_gets_generic_message() {
    let mut page = mounted(MOUSE_LIST);
    page.open_create();
    fill_keyboard(&mut page);
    page_transport(&page).respond(500, "Internal Server Error");

    page.submit_editor();

    let notifications = page.take_notifications();
    assert_eq!(notifications[0].messages, ["Could not create product"]);
}

#[test]
fn edit_flow_seeds_draft_and_updates_in_place() {
    let mut page = mounted(TWO_PRODUCTS);
    assert!(page.open_edit(&ProductId::from("1")));
    assert_eq!(
        page.overlay(),
        Overlay::Editor(EditorMode::Edit(ProductId::from("1")))
    );
    assert_eq!(page.editor().unwrap().draft().name, "Mouse");
    assert_eq!(page.editor().unwrap().draft().price, "99.9");

    page.editor_mut().unwrap().set(Field::Name, "Gaming mouse");
    page_transport(&page).respond(
        200,
        r#"{"data":{"id":"1","name":"Gaming mouse","description":"Wireless mouse","price":99.9,"category":"Peripherals"}}"#,
    );
    assert!(matches!(page.submit_editor(), SubmitOutcome::Saved(_)));

    assert_eq!(page.products().len(), 2);
    assert_eq!(page.products()[0].name, "Gaming mouse");
    assert_eq!(page.products()[1].name, "Keyboard");
    assert_eq!(page.take_notifications()[0].title, "Product updated");
}

#[test]
fn switching_from_edit_to_create_discards_the_draft() {
    let mut page = mounted(TWO_PRODUCTS);
    page.open_edit(&ProductId::from("2"));
    page.editor_mut().unwrap().set(Field::Category, "Changed");

    page.open_create();

    let form = page.editor().unwrap();
    assert_eq!(form.mode(), &EditorMode::Create);
    assert!(form.draft().name.is_empty());
    assert!(form.draft().category.is_empty());
}

#[test]
fn open_edit_ignores_unknown_ids() {
    let mut page = mounted(MOUSE_LIST);
    assert!(!page.open_edit(&ProductId::from("missing")));
    assert_eq!(page.overlay(), Overlay::None);
}

#[test]
fn cancel_editor_has_no_side_effects() {
    let mut page = mounted(MOUSE_LIST);
    page.open_create();
    fill_keyboard(&mut page);
    let sent_before = page_transport(&page).request_count();

    page.cancel();

    assert_eq!(page.overlay(), Overlay::None);
    assert!(page.editor().is_none());
    assert_eq!(page_transport(&page).request_count(), sent_before);
}

#[test]
fn delete_confirmation_flow() {
    let mut page = mounted(TWO_PRODUCTS);

    page.request_delete(ProductId::from("2"));
    assert_eq!(page.overlay(), Overlay::DeleteConfirm(ProductId::from("2")));
    assert_eq!(page.pending_delete(), Some(&ProductId::from("2")));

    page.cancel();
    assert_eq!(page.products().len(), 2);
    assert!(page.pending_delete().is_none());
    assert_eq!(page.overlay(), Overlay::None);

    page.request_delete(ProductId::from("2"));
    page_transport(&page).respond(204, "");
    assert_eq!(page.confirm_delete(), Some(Ok(())));

    assert!(page.pending_delete().is_none());
    assert_eq!(page.products().len(), 1);
    assert!(page.store().get(&ProductId::from("2")).is_none());
    assert_eq!(page.take_notifications()[0].title, "Product deleted");
}

#[test]
fn failed_delete_still_closes_the_dialog() {
    let mut page = mounted(TWO_PRODUCTS);
    page.request_delete(ProductId::from("2"));
    page_transport(&page).fail("timed out");

    let result = page.confirm_delete();

    assert!(matches!(result, Some(Err(_))));
    assert_eq!(page.overlay(), Overlay::None);
    assert_eq!(page.products().len(), 2);
    let notifications = page.take_notifications();
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].messages, ["Could not delete product"]);
}

#[test]
fn deleting_the_last_row_on_the_last_page_moves_back_a_page() {
    let rows: Vec<String> = (1..=11)
        .map(|i| {
            format!(
                r#"{{"id":"{i}","name":"Item {i:02}","description":"Catalog item","price":10,"category":"Misc"}}"#
            )
        })
        .collect();
    let mut page = mounted(&format!("[{}]", rows.join(",")));
    page.go_to_page(1);
    assert_eq!(page.table().page_index(), 1);
    assert!(page.render_table().contains("Item 11"));

    page.request_delete(ProductId::from("11"));
    page_transport(&page).respond(204, "");
    assert_eq!(page.confirm_delete(), Some(Ok(())));

    assert_eq!(page.products().len(), 10);
    assert_eq!(page.table().page_index(), 0);
    let rendered = page.render_table();
    assert!(rendered.contains("Item 01"));
    assert!(!rendered.contains("No products found."));
}

#[test]
fn out_of_range_page_is_clamped() {
    let mut page = mounted(TWO_PRODUCTS);
    page.go_to_page(98);
    assert_eq!(page.table().page_index(), 0);
    assert!(page.render_table().contains("Mouse"));
}

#[test]
fn confirm_without_pending_target_does_nothing() {
    let mut page = mounted(MOUSE_LIST);
    assert_eq!(page.confirm_delete(), None);
}

#[test]
fn rendered_table_reflects_the_cache() {
    let mut page = mounted(TWO_PRODUCTS);
    let rendered = page.render_table();
    assert!(rendered.contains("Mouse"));
    assert!(rendered.contains("R$ 150.00"));

    page.table_mut().set_filter("key");
    let rendered = page.render_table();
    assert!(!rendered.contains("Mouse"));
}

fn page_transport(page: &ProductsPage<ScriptedTransport>) -> &ScriptedTransport {
    page.service().transport()
}
