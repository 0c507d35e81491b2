pub mod books;
pub mod products;

use catalog_kernel::ModuleRegistry;

/// Register every application module, in mount order.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(products::create_module());
    registry.register(books::create_module());
}
