use std::collections::BTreeMap;

use crate::catalog::types::{Category, Product};
use crate::orders::types::{Order, OrderLine};
use crate::users::types::User;

/// The complete relational state of one database endpoint.
///
/// A plain value type so a transaction can snapshot it at begin time and
/// restore it wholesale on rollback. Row ids are allocated here, per table,
/// so id sequences survive deletes the way auto-increment columns do.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub categories: BTreeMap<i64, Category>,
    pub products: BTreeMap<i64, Product>,
    pub users: BTreeMap<i64, User>,
    pub orders: BTreeMap<i64, Order>,
    pub order_lines: BTreeMap<i64, OrderLine>,

    next_category_id: i64,
    next_product_id: i64,
    next_user_id: i64,
    next_order_id: i64,
    next_order_line_id: i64,
}

impl Tables {
    pub fn insert_category(&mut self, mut category: Category) -> i64 {
        self.next_category_id += 1;
        category.id = self.next_category_id;
        self.categories.insert(category.id, category);
        self.next_category_id
    }

    /// Removes a category, nulling the `category_id` of every product that
    /// referenced it (weak reference, `ON DELETE SET NULL`).
    pub fn remove_category(&mut self, id: i64) -> Option<Category> {
        let removed = self.categories.remove(&id)?;
        for product in self.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Some(removed)
    }

    pub fn insert_product(&mut self, mut product: Product) -> i64 {
        self.next_product_id += 1;
        product.id = self.next_product_id;
        self.products.insert(product.id, product);
        self.next_product_id
    }

    /// Removes a product, nulling the `product_id` of every order line that
    /// referenced it. Historical lines keep their quantity and price
    /// snapshot.
    pub fn remove_product(&mut self, id: i64) -> Option<Product> {
        let removed = self.products.remove(&id)?;
        for line in self.order_lines.values_mut() {
            if line.product_id == Some(id) {
                line.product_id = None;
            }
        }
        Some(removed)
    }

    pub fn insert_user(&mut self, mut user: User) -> i64 {
        self.next_user_id += 1;
        user.id = self.next_user_id;
        self.users.insert(user.id, user);
        self.next_user_id
    }

    /// Removes a user and cascades to their orders and order lines.
    pub fn remove_user(&mut self, id: i64) -> Option<User> {
        let removed = self.users.remove(&id)?;
        let owned: Vec<i64> = self
            .orders
            .values()
            .filter(|order| order.user_id == id)
            .map(|order| order.id)
            .collect();
        for order_id in owned {
            self.remove_order(order_id);
        }
        Some(removed)
    }

    /// Inserts an order header together with all of its lines as one
    /// multi-row write. Line `order_id`s are filled in here; callers supply
    /// lines with placeholder ids.
    pub fn insert_order(&mut self, mut order: Order, lines: Vec<OrderLine>) -> i64 {
        self.next_order_id += 1;
        order.id = self.next_order_id;
        let order_id = order.id;
        self.orders.insert(order_id, order);

        for mut line in lines {
            self.next_order_line_id += 1;
            line.id = self.next_order_line_id;
            line.order_id = order_id;
            self.order_lines.insert(line.id, line);
        }

        order_id
    }

    /// Removes an order and its lines (strong reference, `ON DELETE CASCADE`).
    pub fn remove_order(&mut self, id: i64) -> Option<Order> {
        let removed = self.orders.remove(&id)?;
        self.order_lines.retain(|_, line| line.order_id != id);
        Some(removed)
    }

    /// Lines of one order, in insertion (id) order.
    pub fn lines_for_order(&self, order_id: i64) -> Vec<OrderLine> {
        self.order_lines
            .values()
            .filter(|line| line.order_id == order_id)
            .cloned()
            .collect()
    }

    pub fn category_name_taken(&self, name: &str) -> bool {
        self.categories.values().any(|c| c.name == name)
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.users.values().any(|u| u.username == username)
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }
}
