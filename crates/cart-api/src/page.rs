//! # HTML Pages
//!
//! Server-rendered cart page and landing page. The cart page hosts the
//! PayPal buttons script and forwards every widget callback to the JSON
//! endpoints under `/api/v1/cart`.

use cart_core::{CartRow, CartSummary, CartView, PaymentPanel};

const SDK_URL: &str = "https://www.paypal.com/sdk/js";

/// Simple HTML escape
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
</head>
<body style="font-family: system-ui; max-width: 960px; margin: 40px auto;">
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

/// Landing page; shows the thank-you message after a payment
pub fn home(message: Option<&str>) -> String {
    let body = match message.filter(|m| !m.is_empty()) {
        Some(name) => format!(
            r#"<h1>Thank you, {}!</h1>
<p>Your payment was processed successfully.</p>
<p><a href="/cart">Back to cart</a></p>"#,
            escape_html(name)
        ),
        None => r#"<h1>Golden Era Gaming</h1>
<p><a href="/cart">View cart</a></p>"#
            .to_string(),
    };
    layout("Golden Era Gaming", &body)
}

/// Cart page for the given view
pub fn cart(view: &CartView, client_id: &str, currency: &str) -> String {
    let content = match view {
        CartView::Empty { message } => format!("<div>{}</div>", escape_html(message)),
        CartView::Filled { rows, summary } => format!(
            r#"<div style="display: grid; grid-template-columns: 3fr 1fr; gap: 20px;">
<table style="width: 100%;">
    <thead>
        <tr><th>Item</th><th>Quantity</th><th>Price</th><th>Remove</th></tr>
    </thead>
    <tbody>
{rows}
    </tbody>
</table>
{summary}
</div>
{script}"#,
            rows = rows.iter().map(row).collect::<Vec<_>>().join("\n"),
            summary = summary_panel(summary),
            script = cart_script(&summary.payment, client_id, currency)
        ),
    };

    layout(
        "Shopping Cart",
        &format!("<h1>Shopping Cart</h1>\n{}", content),
    )
}

fn row(row: &CartRow) -> String {
    let options = row
        .quantity_choices
        .iter()
        .map(|n| {
            let selected = if *n == row.quantity { " selected" } else { "" };
            format!(r#"<option value="{n}"{selected}>{n}</option>"#)
        })
        .collect::<String>();
    let disabled = if row.quantity_editable { "" } else { " disabled" };

    format!(
        r#"        <tr data-slug="{slug}">
            <td><a href="{href}"><img src="{image}" alt="{name}" width="100" height="100"> {name}</a></td>
            <td><select name="quantity"{disabled}>{options}</select></td>
            <td>{price}</td>
            <td><button class="remove" data-slug="{slug}">Remove</button></td>
        </tr>"#,
        slug = escape_html(&row.slug),
        href = escape_html(&row.href),
        image = escape_html(&row.image),
        name = escape_html(&row.name),
        disabled = disabled,
        options = options,
        price = escape_html(&row.price),
    )
}

fn summary_panel(summary: &CartSummary) -> String {
    let payment = match &summary.payment {
        PaymentPanel::Hidden => String::new(),
        PaymentPanel::Loading => r#"<li><div id="paypal-buttons">Loading...</div></li>"#.to_string(),
        PaymentPanel::Unavailable => {
            r#"<li><div id="paypal-buttons">Payment is unavailable right now.</div></li>"#.to_string()
        }
        PaymentPanel::Buttons { .. } => r#"<li><div id="paypal-buttons"></div></li>"#.to_string(),
    };

    format!(
        r#"<div class="card">
    <ul style="list-style: none; padding: 0;">
        <li>{label}</li>
        {payment}
    </ul>
</div>"#,
        label = escape_html(&summary.label()),
        payment = payment
    )
}

/// Remove controls, plus the widget loader while the order is unpaid
fn cart_script(payment: &PaymentPanel, client_id: &str, currency: &str) -> String {
    let widget = match payment {
        PaymentPanel::Hidden | PaymentPanel::Unavailable => String::new(),
        PaymentPanel::Loading | PaymentPanel::Buttons { .. } => format!(
            r#"
const sdk = document.createElement('script');
sdk.src = '{sdk}?client-id={client_id}&currency={currency}';
sdk.onload = () => reportStatus('resolved').then(renderButtons);
sdk.onerror = () => reportStatus('rejected').then(() => window.location.reload());
document.head.appendChild(sdk);
"#,
            sdk = SDK_URL,
            client_id = escape_html(client_id),
            currency = escape_html(currency)
        ),
    };

    format!(
        r#"<script>
const json = {{ 'Content-Type': 'application/json' }};

document.querySelectorAll('button.remove').forEach((button) => {{
    button.addEventListener('click', () => {{
        fetch('/api/v1/cart/items/' + encodeURIComponent(button.dataset.slug), {{ method: 'DELETE' }})
            .then(() => window.location.reload());
    }});
}});

function reportStatus(status) {{
    return fetch('/api/v1/cart/widget', {{ method: 'POST', headers: json, body: JSON.stringify({{ status }}) }});
}}

function renderButtons() {{
    const slot = document.getElementById('paypal-buttons');
    slot.textContent = '';
    paypal.Buttons({{
        createOrder: () => fetch('/api/v1/cart/orders', {{ method: 'POST' }})
            .then((r) => r.ok ? r.json() : r.json().then((e) => Promise.reject(e.error)))
            .then((order) => order.id),
        onShippingChange: (data, actions) => fetch('/api/v1/cart/orders/' + data.orderID + '/shipping', {{
                method: 'PATCH',
                headers: json,
                body: JSON.stringify({{
                    shipping_option: data.selected_shipping_option || data.shipping_option,
                    shipping_address: data.shipping_address,
                }}),
            }}).then((r) => r.ok ? actions.resolve() : actions.reject()),
        onApprove: (data) => fetch('/api/v1/cart/orders/' + data.orderID + '/capture', {{ method: 'POST' }})
            .then((r) => r.json())
            .then((result) => {{ window.location.href = result.redirect; }}),
        onError: (err) => fetch('/api/v1/cart/errors', {{
                method: 'POST',
                headers: json,
                body: JSON.stringify({{ message: String(err) }}),
            }}),
    }}).render('#paypal-buttons');
}}
{widget}
</script>"#,
        widget = widget
    )
}
