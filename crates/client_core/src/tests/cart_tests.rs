use super::*;
use rust_decimal::Decimal;

fn widget_catalog() -> Cart {
    Cart::new(vec![Product::new(
        ProductId(1),
        "Widget",
        Decimal::new(5000, 2),
        3,
    )])
}

fn mixed_catalog() -> Cart {
    Cart::new(vec![
        Product::new(ProductId(1), "Widget", Decimal::new(5000, 2), 3),
        Product::new(ProductId(2), "Gadget", Decimal::new(1999, 2), 5),
        Product::new(ProductId(3), "Sold out", Decimal::new(100, 2), 0),
    ])
}

fn available(cart: &Cart, product_id: ProductId) -> u32 {
    cart.product(product_id)
        .expect("product in catalog")
        .available_quantity
}

#[test]
fn widget_walkthrough_respects_stock() {
    let mut cart = widget_catalog();

    cart.add(ProductId(1), 2).expect("first add");
    assert_eq!(cart.quantity(ProductId(1)), 2);
    assert_eq!(available(&cart, ProductId(1)), 1);

    let err = cart.add(ProductId(1), 2).expect_err("over stock");
    assert_eq!(
        err,
        ShopError::LimitExceeded {
            product_id: ProductId(1),
            max_addable: 1,
        }
    );
    assert_eq!(cart.quantity(ProductId(1)), 2);
    assert_eq!(available(&cart, ProductId(1)), 1);

    assert_eq!(cart.remove(ProductId(1), 1).expect("remove"), 1);
    assert_eq!(cart.quantity(ProductId(1)), 1);
    assert_eq!(available(&cart, ProductId(1)), 2);

    let totals = cart.totals();
    assert_eq!(totals.subtotal, Decimal::new(50, 0));
    assert_eq!(totals.discount, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::new(50, 0));
    assert!(cart.is_consistent());
}

#[test]
fn add_rejects_zero_quantity_and_unknown_products() {
    let mut cart = widget_catalog();
    assert_eq!(
        cart.add(ProductId(1), 0),
        Err(ShopError::InvalidQuantity(0))
    );
    assert_eq!(
        cart.add(ProductId(9), 1),
        Err(ShopError::UnknownProduct(ProductId(9)))
    );
    assert!(cart.is_empty());
}

#[test]
fn add_on_sold_out_product_reports_zero_addable() {
    let mut cart = mixed_catalog();
    assert!(!cart.can_add(ProductId(3)));
    assert_eq!(
        cart.add(ProductId(3), 1),
        Err(ShopError::LimitExceeded {
            product_id: ProductId(3),
            max_addable: 0,
        })
    );
    assert_eq!(available(&cart, ProductId(3)), 0);
}

#[test]
fn add_with_huge_quantity_does_not_overflow() {
    let mut cart = widget_catalog();
    cart.add(ProductId(1), 1).expect("add");
    let err = cart.add(ProductId(1), u32::MAX).expect_err("over stock");
    assert_eq!(
        err,
        ShopError::LimitExceeded {
            product_id: ProductId(1),
            max_addable: 2,
        }
    );
}

#[test]
fn can_add_follows_shelf_count() {
    let mut cart = widget_catalog();
    assert!(cart.can_add(ProductId(1)));
    cart.add(ProductId(1), 3).expect("take everything");
    assert!(!cart.can_add(ProductId(1)));
    assert!(!cart.can_add(ProductId(42)));
}

#[test]
fn removing_last_unit_drops_the_line() {
    let mut cart = widget_catalog();
    cart.add(ProductId(1), 1).expect("add");
    cart.remove(ProductId(1), 1).expect("remove");
    assert!(cart.is_empty());
    assert_eq!(cart.lines().count(), 0);
}

#[test]
fn over_removal_restores_only_what_was_in_the_cart() {
    let mut cart = widget_catalog();
    cart.add(ProductId(1), 2).expect("add");

    let removed = cart.remove(ProductId(1), 5).expect("remove");
    assert_eq!(removed, 2);
    assert!(cart.is_empty());
    assert_eq!(available(&cart, ProductId(1)), 3);
    assert!(cart.is_consistent());
}

#[test]
fn removing_absent_product_is_a_no_op() {
    let mut cart = mixed_catalog();
    assert_eq!(cart.remove(ProductId(2), 1).expect("remove"), 0);
    assert_eq!(cart.remove(ProductId(77), 1).expect("remove"), 0);
    assert_eq!(available(&cart, ProductId(2)), 5);
    assert_eq!(
        cart.remove(ProductId(2), 0),
        Err(ShopError::InvalidQuantity(0))
    );
}

#[test]
fn conservation_holds_across_mixed_sequences() {
    let mut cart = mixed_catalog();
    let ops: [(bool, i64, u32); 14] = [
        (true, 1, 1),
        (true, 2, 3),
        (true, 1, 5),
        (false, 2, 1),
        (true, 3, 1),
        (true, 2, 3),
        (false, 1, 4),
        (true, 1, 3),
        (false, 2, 10),
        (true, 2, 5),
        (false, 3, 1),
        (true, 2, 1),
        (false, 1, 1),
        (true, 1, 1),
    ];

    for (is_add, id, qty) in ops {
        let id = ProductId(id);
        if is_add {
            let _ = cart.add(id, qty);
        } else {
            cart.remove(id, qty).expect("remove");
        }
        assert!(cart.is_consistent(), "conservation broken after {id} x{qty}");
    }
    assert_eq!(cart.quantity(ProductId(1)), 3);
    assert_eq!(cart.quantity(ProductId(2)), 5);
    assert_eq!(available(&cart, ProductId(2)), 0);
}

#[test]
fn subtotal_moves_with_each_unit() {
    let mut cart = mixed_catalog();
    let mut last = cart.totals().subtotal;
    for id in [1, 2, 2, 1, 2] {
        cart.add(ProductId(id), 1).expect("add");
        let subtotal = cart.totals().subtotal;
        assert!(subtotal >= last);
        last = subtotal;
    }
    for id in [2, 1, 2] {
        cart.remove(ProductId(id), 1).expect("remove");
        let subtotal = cart.totals().subtotal;
        assert!(subtotal <= last);
        last = subtotal;
    }
}

#[test]
fn order_request_lists_lines_by_product_id() {
    let mut cart = mixed_catalog();
    cart.add(ProductId(2), 2).expect("add gadget");
    cart.add(ProductId(1), 1).expect("add widget");

    let request = cart.order_request();
    assert_eq!(
        request.items,
        vec![
            OrderItem {
                product_id: ProductId(1),
                quantity: 1,
            },
            OrderItem {
                product_id: ProductId(2),
                quantity: 2,
            },
        ]
    );
}

#[test]
fn consumed_cart_keeps_shelf_counts_and_stays_consistent() {
    let mut cart = mixed_catalog();
    cart.add(ProductId(1), 2).expect("add");
    cart.add(ProductId(2), 1).expect("add");

    cart.consume_cart();

    assert!(cart.is_empty());
    assert_eq!(available(&cart, ProductId(1)), 1);
    assert_eq!(available(&cart, ProductId(2)), 4);
    assert!(cart.is_consistent());

    cart.add(ProductId(1), 1).expect("last widget");
    assert_eq!(
        cart.add(ProductId(1), 1),
        Err(ShopError::LimitExceeded {
            product_id: ProductId(1),
            max_addable: 0,
        })
    );
    assert!(cart.is_consistent());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "duplicate product id 1")]
fn duplicate_catalog_ids_are_caught() {
    let _ = Cart::new(vec![
        Product::new(ProductId(1), "Widget", Decimal::ONE, 1),
        Product::new(ProductId(1), "Widget again", Decimal::ONE, 2),
    ]);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "priced above the catalog cap")]
fn prices_above_cap_are_caught() {
    let _ = Cart::new(vec![Product::new(
        ProductId(1),
        "Galaxy",
        Decimal::from(10_000_000_000_u64),
        10,
    )]);
}
