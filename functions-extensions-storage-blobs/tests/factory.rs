//! End-to-end composition of the connection-strategy probe and the LRU
//! cache behind the resource-factory registry.

use functions_extensions_base::registry::ResourceFactoryRegistry;
use functions_extensions_base::tags::AZURE_STORAGE_BLOBS;
use functions_extensions_base::{BindingData, BindingInput};
use functions_extensions_storage_blobs::factory;

fn blob_binding(setting: &str, container_blob: &str) -> BindingData {
    BindingData {
        content: None,
        content_type: None,
        source: Some(container_blob.to_string()),
        version: Some(setting.to_string()),
    }
}

#[test]
fn registered_factory_resolves_a_client_through_the_registry() {
    std::env::set_var(
        "TEST_STORAGE_ACCOUNT_FACTORY",
        "DefaultEndpointsProtocol=https;AccountName=test;AccountKey=key;",
    );

    let registry = ResourceFactoryRegistry::default();
    factory::register(&registry).unwrap();
    assert!(registry.has(AZURE_STORAGE_BLOBS));

    let output = registry
        .create(
            AZURE_STORAGE_BLOBS,
            BindingInput::Single(blob_binding("TEST_STORAGE_ACCOUNT_FACTORY", "mycontainer/myblob.txt")),
        )
        .unwrap();
    let client = output.downcast_ref::<factory::BlobClient>().unwrap();
    assert_eq!(client.container, "mycontainer");
    assert_eq!(client.blob, "myblob.txt");

    std::env::remove_var("TEST_STORAGE_ACCOUNT_FACTORY");
}

#[test]
fn unconfigured_setting_name_surfaces_as_an_error() {
    let registry = ResourceFactoryRegistry::default();
    factory::register(&registry).unwrap();

    let err = registry
        .create(
            AZURE_STORAGE_BLOBS,
            BindingInput::Single(blob_binding("TEST_STORAGE_ACCOUNT_NOT_SET", "mycontainer/myblob.txt")),
        )
        .unwrap_err();
    assert!(err.downcast_ref::<functions_extensions_storage_blobs::Error>().is_some());
}
