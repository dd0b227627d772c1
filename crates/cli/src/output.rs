//! Plain-text rendering for terminal output.

#![allow(clippy::print_stdout)]

use std::io::Write;

use hadi_books_admin::dashboard::DashboardStats;
use hadi_books_admin::hero::{HeroImageManager, MAX_ACTIVE_HERO_IMAGES};
use hadi_books_admin::listing::{CategoryFilter, ListState, OrderFilter};
use hadi_books_admin::models::{AdminSession, Order, Product};

pub fn line(text: &str) {
    println!("{text}");
}

pub fn heading(text: &str) {
    println!();
    println!("== {text} ==");
}

/// Print a prompt label without a newline.
pub fn prompt(label: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{label}: ")?;
    stdout.flush()
}

pub fn session(session: &AdminSession) {
    let id = session.id.as_ref().map(ToString::to_string).unwrap_or_default();
    println!("  id:      {id}");
    println!("  name:    {}", session.name);
    println!("  email:   {}", session.email);
    if !session.profile_picture.is_empty() {
        println!("  picture: {}", session.profile_picture);
    }
}

pub fn products(state: &ListState<Product, CategoryFilter>) {
    if let Some(message) = state.empty_message {
        println!("{message}");
        return;
    }
    println!(
        "{:<26} {:<40} {:<20} {:>10}  {:<9} {}",
        "ID", "NAME", "AUTHOR", "PRICE", "STOCK", "BESTSELLER"
    );
    for product in &state.items {
        println!(
            "{:<26} {:<40} {:<20} {:>10}  {:<9} {}",
            product.id.as_str(),
            truncate(&product.name, 40),
            truncate(&product.author, 20),
            product.price.to_string(),
            if product.availability { "in" } else { "out" },
            if product.bestseller { "yes" } else { "" },
        );
    }
    page_footer(state.page, state.pages, state.total);
}

pub fn product(product: &Product) {
    println!("{} ({})", product.name, product.id);
    println!("  author:   {}", product.author);
    println!("  category: {}", product.category);
    if !product.sub_categories.is_empty() {
        println!("  tags:     {}", product.sub_categories.join(", "));
    }
    println!("  language: {}", product.language);
    match product.original_price {
        Some(original) => println!("  price:    {} (was {original})", product.price),
        None => println!("  price:    {}", product.price),
    }
    if let Some(isbn) = &product.isbn {
        println!("  isbn:     {isbn}");
    }
    println!("  in stock: {}", product.availability);
    println!("  bestseller: {}", product.bestseller);
    println!();
    println!("{}", product.description);

    let reviews = product.reviews_newest_first();
    if !reviews.is_empty() {
        heading(&format!("Reviews ({})", reviews.len()));
        for review in reviews {
            println!(
                "  [{}/5] {}: {}",
                review.rating,
                review.author_name(),
                review.comment.as_deref().unwrap_or_default()
            );
        }
    }
}

pub fn orders(state: &ListState<Order, OrderFilter>) {
    if let Some(message) = state.empty_message {
        println!("{message}");
        return;
    }
    println!(
        "{:<26} {:<24} {:>10}  {:<12} {}",
        "ID", "CUSTOMER", "TOTAL", "STATUS", "PAYMENT"
    );
    for order in &state.items {
        println!(
            "{:<26} {:<24} {:>10}  {:<12} {}{}",
            order.id.as_str(),
            truncate(&order.customer_name(), 24),
            order.total_price.to_string(),
            order.status.as_str(),
            order.payment_status,
            if order.has_payment_proof() {
                " (proof uploaded)"
            } else {
                ""
            },
        );
    }
    page_footer(state.page, state.pages, state.total);
}

pub fn order(order: &Order) {
    println!("Order {}", order.id);
    println!("  customer: {}", order.customer_name());
    println!("  total:    {}", order.total_price);
    println!("  status:   {}", order.status);
    println!("  payment:  {}", order.payment_status);
    if let Some(tracking_id) = &order.tracking_id {
        println!("  tracking: {tracking_id}");
    }
    if let Some(method) = &order.shipping_method {
        println!("  shipping: {method}");
    }
    if let Some(eta) = &order.estimated_delivery {
        println!("  eta:      {eta}");
    }
    for item in &order.items {
        println!("  - {} x{}", item.product_name(), item.quantity);
    }
}

pub fn hero_images(heroes: &HeroImageManager) {
    println!(
        "{} active of {MAX_ACTIVE_HERO_IMAGES} allowed",
        heroes.active_count()
    );
    for hero in heroes.images() {
        println!(
            "  {:<26} {:<8} {:<40} {}",
            hero.id.as_str(),
            if hero.is_active { "active" } else { "inactive" },
            truncate(hero.alt_text_or_placeholder(), 40),
            hero.image_url,
        );
    }
    if heroes.at_limit() {
        println!("Active limit reached. Deactivate an image before adding another.");
    }
}

pub fn dashboard(stats: &DashboardStats) {
    println!("Products:   {}", stats.products);
    println!("Orders:     {}", stats.orders);
    println!("  pending:    {}", stats.order_stats.pending_orders);
    println!("  processing: {}", stats.order_stats.processing_orders);
    println!("  delivered:  {}", stats.order_stats.delivered_orders);
    println!("Revenue:    {}", stats.order_stats.total_revenue);
}

fn page_footer(page: u32, pages: u32, total: u64) {
    println!();
    println!("Page {page} of {pages} ({total} total)");
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
