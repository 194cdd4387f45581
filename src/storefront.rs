//! The product page for the source code kit.
//!
//! Static product content plus the gate in front of the checkout: the payment
//! section, and with it the [`CheckoutForm`], only exists after `buy_now`.

use alloy_primitives::Address;
use kitpay_types::FIXED_RECIPIENT;
use kitpay_types::pricing::PRICE_USD;
use serde::Serialize;

use crate::checkout::CheckoutForm;
use crate::dispatcher::TransactionDispatcher;
use crate::session::WalletSessionAdapter;

/// Where the kit is delivered after a successful payment.
pub const DOWNLOAD_LINK: &str =
    "https://drive.google.com/file/d/1KQj_LQOZdUgOSGLv0-s9X0wjv1YxDGE6/view";

/// Seller contact for buyers who paid manually.
pub const TELEGRAM_CONTACT_URL: &str = "https://t.me/ihrahat0";
pub const CONTACT_EMAIL: &str = "programmer.ihrahat@gmail.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub title: &'static str,
    pub category: &'static str,
    pub tagline: &'static str,
    pub description: &'static str,
    pub price_usd: &'static str,
    pub image_url: &'static str,
    pub demo_video_url: &'static str,
    pub features: &'static [&'static str],
}

pub static PRODUCT: ProductListing = ProductListing {
    title: "Web3 Multi-Chain Integration Kit",
    category: "Multi-Chain Swap",
    tagline: "Supported chains : Ethereum, Binance Smart chain, Base, Solana",
    description: "Supporting Dexs are Uniswap, Pancakeswap, 1Inch, Raydium, Jupiter. \
                  Also all pump.fun tokens will be swapable.",
    price_usd: PRICE_USD,
    image_url: "https://images.unsplash.com/photo-1566837945700-30057527ade0?ixlib=rb-4.0.3&auto=format&fit=crop&w=900&q=80",
    demo_video_url: "https://www.youtube.com/embed/jzblEVYfh6o",
    features: &[
        "Multi-Chain Support",
        "Recieve Fee's",
        "React & Next.js Integration",
        "Full Documentation & Support",
    ],
};

/// Instructions for paying from any wallet without connecting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualPayment {
    pub recipient: Address,
    pub contact_url: &'static str,
    pub contact_email: &'static str,
}

pub fn manual_payment() -> ManualPayment {
    ManualPayment {
        recipient: FIXED_RECIPIENT,
        contact_url: TELEGRAM_CONTACT_URL,
        contact_email: CONTACT_EMAIL,
    }
}

/// The landing page for one buyer.
#[derive(Debug)]
pub struct Storefront {
    session: WalletSessionAdapter,
    checkout: Option<CheckoutForm>,
}

impl Storefront {
    pub fn new(session: WalletSessionAdapter) -> Self {
        Self {
            session,
            checkout: None,
        }
    }

    pub fn product(&self) -> &'static ProductListing {
        &PRODUCT
    }

    pub fn is_payment_visible(&self) -> bool {
        self.checkout.is_some()
    }

    /// Reveals the payment section. Repeated calls keep the existing form.
    pub fn buy_now(&mut self) -> &CheckoutForm {
        self.checkout.get_or_insert_with(|| {
            tracing::debug!("Payment section opened");
            let dispatcher = TransactionDispatcher::new(self.session.clone());
            CheckoutForm::new(self.session.clone(), dispatcher)
        })
    }

    pub fn checkout(&self) -> Option<&CheckoutForm> {
        self.checkout.as_ref()
    }

    /// Manual payment details, shown alongside the checkout form.
    pub fn manual_payment(&self) -> Option<ManualPayment> {
        self.checkout.as_ref().map(|_| manual_payment())
    }

    pub fn download_link(&self) -> Option<&'static str> {
        self.checkout.as_ref()?.download_link()
    }
}
