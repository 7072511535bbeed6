//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod user;

// Catalog Domain
pub mod category;
pub mod chef;
pub mod product;
pub mod supplier;

// Orders
pub mod order;

// Back of house
pub mod expense;
pub mod inventory;
pub mod staff;

// Re-exports
pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use chef::{Chef, ChefAvailability, ChefCreate, ChefId, ChefUpdate, Specialization};
pub use expense::{
    Expense, ExpenseCategory, ExpenseCreate, ExpenseId, ExpenseStatus, ExpenseUpdate,
    PaymentMethod,
};
pub use inventory::{InventoryItem, InventoryItemCreate, InventoryItemId, InventoryItemUpdate};
pub use order::{Order, OrderId, OrderLine, OrderWithUser};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use staff::{
    DaySchedule, Department, Gender, Staff, StaffCreate, StaffId, StaffRole, StaffStatus,
    StaffUpdate, TimeSlot, Weekday,
};
pub use supplier::{Supplier, SupplierCreate, SupplierId, SupplierUpdate};
pub use user::{User, UserId, UserRole};
