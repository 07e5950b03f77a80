//! Hand-written GraphQL operation documents.
//!
//! The backend groups operations under namespace fields (`Cart`, `Checkout`,
//! `Discount`, `Payment`, `Markets`, `Channel`); responses are unwrapped by
//! walking `data.<Namespace>.<Operation>`.

// =============================================================================
// Cart
// =============================================================================

pub const CART_FIELDS: &str = r"
    cart_id
    customer_session_id
    currency
    shipping_country
    available_shipping_countries
    subtotal
    shipping
    line_items {
      id
      supplier
      sku
      barcode
      brand
      product_id
      title
      variant_id
      variant_title
      quantity
      image { id url width height order }
      price { amount currency_code amount_incl_taxes tax_amount tax_rate compare_at }
      shipping {
        id
        name
        description
        price { amount currency_code amount_incl_taxes tax_amount tax_rate }
      }
      available_shippings {
        id
        name
        description
        country_code
        price { amount currency_code amount_incl_taxes }
      }
    }";

pub fn create_cart() -> String {
    format!(
        r"mutation CreateCart($customerSessionId: String!, $currency: String!, $shippingCountry: String) {{
  Cart {{
    CreateCart(customer_session_id: $customerSessionId, currency: $currency, shipping_country: $shippingCountry) {{{CART_FIELDS}
    }}
  }}
}}"
    )
}

pub fn get_cart() -> String {
    format!(
        r"query GetCart($cartId: String!) {{
  Cart {{
    GetCart(cart_id: $cartId) {{{CART_FIELDS}
    }}
  }}
}}"
    )
}

pub fn add_item() -> String {
    format!(
        r"mutation AddItem($cartId: String!, $lineItems: [LineItemInput!]!) {{
  Cart {{
    AddItem(cart_id: $cartId, line_items: $lineItems) {{{CART_FIELDS}
    }}
  }}
}}"
    )
}

pub fn update_item() -> String {
    format!(
        r"mutation UpdateItem($cartId: String!, $cartItemId: String!, $shippingId: String, $qty: Int) {{
  Cart {{
    UpdateItem(cart_id: $cartId, cart_item_id: $cartItemId, shipping_id: $shippingId, qty: $qty) {{{CART_FIELDS}
    }}
  }}
}}"
    )
}

pub fn delete_item() -> String {
    format!(
        r"mutation DeleteItem($cartId: String!, $cartItemId: String!) {{
  Cart {{
    DeleteItem(cart_id: $cartId, cart_item_id: $cartItemId) {{{CART_FIELDS}
    }}
  }}
}}"
    )
}

pub const GET_LINE_ITEMS_BY_SUPPLIER: &str = r"query GetLineItemsBySupplier($cartId: String!) {
  Cart {
    GetLineItemsBySupplier(cart_id: $cartId) {
      supplier
      line_items {
        id
        supplier
        product_id
        quantity
        price { amount currency_code amount_incl_taxes }
        shipping {
          id
          name
          description
          price { amount currency_code amount_incl_taxes }
        }
      }
      available_shippings {
        id
        name
        description
        country_code
        price { amount currency_code amount_incl_taxes }
      }
    }
  }
}";

// =============================================================================
// Discounts
// =============================================================================

pub const ADD_DISCOUNT: &str = r"mutation AddDiscount($code: String!, $percentage: Int!, $startDate: String!, $endDate: String!, $typeId: Int!) {
  Discount {
    AddDiscount(code: $code, percentage: $percentage, start_date: $startDate, end_date: $endDate, type_id: $typeId) {
      id
      code
      percentage
      start_date
      end_date
    }
  }
}";

pub const APPLY_DISCOUNT: &str = r"mutation ApplyDiscount($code: String!, $cartId: String!) {
  Discount {
    ApplyDiscount(code: $code, cart_id: $cartId) {
      executed
      message
    }
  }
}";

pub const DELETE_APPLIED_DISCOUNT: &str = r"mutation DeleteAppliedDiscount($code: String!, $cartId: String!) {
  Discount {
    DeleteAppliedDiscount(code: $code, cart_id: $cartId) {
      executed
      message
    }
  }
}";

pub const DELETE_DISCOUNT: &str = r"mutation DeleteDiscount($discountId: Int!) {
  Discount {
    DeleteDiscount(discount_id: $discountId) {
      executed
      message
    }
  }
}";

pub const GET_DISCOUNTS: &str = r"query GetDiscounts {
  Discount {
    GetDiscounts {
      id
      code
      percentage
      start_date
      end_date
    }
  }
}";

pub const GET_DISCOUNTS_BY_CHANNEL: &str = r"query GetDiscountsByChannel {
  Discount {
    GetDiscountsByChannel {
      id
      code
      percentage
      start_date
      end_date
    }
  }
}";

// =============================================================================
// Checkout
// =============================================================================

// Checkout responses are kept raw: the id field name varies by mutation.
pub const CREATE_CHECKOUT: &str = r"mutation CreateCheckout($cartId: String!) {
  Checkout {
    CreateCheckout(cart_id: $cartId) {
      id
      checkout_id
      status
      email
      payment_method
    }
  }
}";

pub const UPDATE_CHECKOUT: &str = r"mutation UpdateCheckout($checkoutId: String!, $email: String, $successUrl: String, $cancelUrl: String, $paymentMethod: String, $shippingAddress: AddressInput, $billingAddress: AddressInput, $buyerAcceptsTermsConditions: Boolean, $buyerAcceptsPurchaseConditions: Boolean) {
  Checkout {
    UpdateCheckout(
      checkout_id: $checkoutId
      email: $email
      success_url: $successUrl
      cancel_url: $cancelUrl
      payment_method: $paymentMethod
      shipping_address: $shippingAddress
      billing_address: $billingAddress
      buyer_accepts_terms_conditions: $buyerAcceptsTermsConditions
      buyer_accepts_purchase_conditions: $buyerAcceptsPurchaseConditions
    ) {
      id
      checkout_id
      status
      email
      payment_method
    }
  }
}";

// =============================================================================
// Payment
// =============================================================================

pub const STRIPE_INTENT: &str = r"mutation CreatePaymentIntentStripe($checkoutId: String!, $returnEphemeralKey: Boolean) {
  Payment {
    CreatePaymentIntentStripe(checkout_id: $checkoutId, return_ephemeral_key: $returnEphemeralKey) {
      client_secret
      customer
      publishable_key
      ephemeral_key
    }
  }
}";

pub const STRIPE_LINK: &str = r"mutation CreatePaymentStripe($checkoutId: String!, $successUrl: String!, $paymentMethod: String!, $email: String!) {
  Payment {
    CreatePaymentStripe(checkout_id: $checkoutId, success_url: $successUrl, payment_method: $paymentMethod, email: $email) {
      checkout_url
      order_id
    }
  }
}";

pub const KLARNA_INIT: &str = r"mutation CreatePaymentKlarna($checkoutId: String!, $countryCode: String!, $href: String!, $email: String) {
  Payment {
    CreatePaymentKlarna(checkout_id: $checkoutId, country_code: $countryCode, href: $href, email: $email) {
      order_id
      status
      locale
      html_snippet
    }
  }
}";

pub const KLARNA_NATIVE_INIT: &str = r"mutation CreatePaymentKlarnaNative($checkoutId: String!, $countryCode: String, $currency: String, $locale: String, $returnUrl: String, $intent: String, $autoCapture: Boolean, $customer: KlarnaNativeCustomerInput, $billingAddress: KlarnaNativeAddressInput, $shippingAddress: KlarnaNativeAddressInput) {
  Payment {
    CreatePaymentKlarnaNative(
      checkout_id: $checkoutId
      country_code: $countryCode
      currency: $currency
      locale: $locale
      return_url: $returnUrl
      intent: $intent
      auto_capture: $autoCapture
      customer: $customer
      billing_address: $billingAddress
      shipping_address: $shippingAddress
    ) {
      cart_id
      checkout_id
      client_token
      purchase_country
      purchase_currency
      session_id
      payment_method_categories { identifier name }
    }
  }
}";

pub const KLARNA_NATIVE_CONFIRM: &str = r"mutation ConfirmPaymentKlarnaNative($checkoutId: String!, $authorizationToken: String!, $autoCapture: Boolean, $customer: KlarnaNativeCustomerInput, $billingAddress: KlarnaNativeAddressInput, $shippingAddress: KlarnaNativeAddressInput) {
  Payment {
    ConfirmPaymentKlarnaNative(
      checkout_id: $checkoutId
      authorization_token: $authorizationToken
      auto_capture: $autoCapture
      customer: $customer
      billing_address: $billingAddress
      shipping_address: $shippingAddress
    ) {
      order_id
      checkout_id
      fraud_status
    }
  }
}";

pub const KLARNA_NATIVE_ORDER: &str = r"query GetKlarnaOrderNative($orderId: String!, $userId: String) {
  Payment {
    GetKlarnaOrderNative(order_id: $orderId, user_id: $userId) {
      order_id
      status
      purchase_country
      purchase_currency
      order_amount
      order_tax_amount
      order_lines { name quantity unit_price total_amount }
      payment_method_categories { identifier name }
    }
  }
}";

pub const VIPPS_INIT: &str = r"mutation CreatePaymentVipps($checkoutId: String!, $email: String!, $returnUrl: String!) {
  Payment {
    CreatePaymentVipps(checkout_id: $checkoutId, email: $email, return_url: $returnUrl) {
      payment_url
    }
  }
}";

// =============================================================================
// Markets & catalog
// =============================================================================

pub const GET_AVAILABLE_MARKETS: &str = r"query GetAvailableMarkets {
  Markets {
    GetAvailableMarkets {
      code
      name
      official
      flag
      phone_code
      currency { code name symbol }
    }
  }
}";

pub const GET_PRODUCTS: &str = r"query GetProducts($currency: String, $imageSize: String, $useCache: Boolean, $shippingCountryCode: String) {
  Channel {
    GetProducts(currency: $currency, image_size: $imageSize, use_cache: $useCache, shipping_country_code: $shippingCountryCode) {
      id
      title
      brand
      description
      sku
      supplier
      quantity
      digital
      price { amount currency_code amount_incl_taxes tax_amount tax_rate compare_at }
      variants {
        id
        title
        sku
        barcode
        quantity
        price { amount currency_code amount_incl_taxes }
        images { id url width height order }
      }
      images { id url width height order }
    }
  }
}";
