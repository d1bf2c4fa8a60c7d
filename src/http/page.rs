//! HTML control panel.
//!
//! Rendered from the latest [`StatusSnapshot`] on every `GET /`, so the
//! slider, selectors and relay buttons reflect the live state.  Buttons
//! call the command endpoints with `fetch` and reload where the layout
//! depends on the answer.

use core::fmt::Write;

use crate::app::events::{Mode, StatusSnapshot};
use crate::config::{
    MAX_BLITZ_MS, MAX_RELAY_COUNT, MAX_RUNNING_SPEED_MS, MIN_BLITZ_MS, MIN_RELAYS,
    MIN_RUNNING_SPEED_MS,
};
use crate::engine::patterns::PatternId;

const HEAD: &str = r#"<!DOCTYPE html><html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>RelayMatrix</title>
<style>
body{margin:0;padding:20px;background:#0a0f1c;color:#fff;font-family:sans-serif}
h2{text-align:center;margin-bottom:10px}
button,select{width:100%;padding:14px;margin:6px 0;border:0;border-radius:10px;background:#1f6cff;color:#fff;font-size:16px}
button.on{background:#19b86b}
select{background:#1f2a48}
input[type=range]{width:100%}
input[type=number]{width:45%;padding:10px;margin:6px 1%;border-radius:8px;border:0}
label{display:block;font-size:14px;opacity:.7;margin-top:12px}
.footer{text-align:center;margin-top:20px;opacity:.6}
</style>
<script>
function go(u,r){fetch(u).then(function(){if(r)location.reload()})}
</script>
</head>
<body>
<h2>RELAY MATRIX</h2>
"#;

const FOOT: &str = r#"<div class="footer">RelayMatrix</div>
</body></html>
"#;

fn on_class(on: bool) -> &'static str {
    if on { " class=\"on\"" } else { "" }
}

fn selected(yes: bool) -> &'static str {
    if yes { " selected" } else { "" }
}

/// Render the control panel for `status`.
pub fn render_page(status: &StatusSnapshot) -> String {
    let mut h = String::with_capacity(4096);
    h.push_str(HEAD);

    // Writing into a String cannot fail.
    let _ = write_body(&mut h, status);

    h.push_str(FOOT);
    h
}

fn write_body(h: &mut String, s: &StatusSnapshot) -> core::fmt::Result {
    for i in 0..s.relay_count {
        writeln!(
            h,
            "<button{} onclick=\"go('/toggle?id={}',1)\">Relay {}</button>",
            on_class(s.is_relay_on(usize::from(i))),
            i,
            i + 1
        )?;
    }

    writeln!(
        h,
        "<button{} onclick=\"go('/run',1)\">RUNNING</button>",
        on_class(s.mode == Mode::Running)
    )?;
    writeln!(
        h,
        "<button{} onclick=\"go('/blitz',1)\">BLITZ</button>",
        on_class(s.mode == Mode::Blitz)
    )?;
    writeln!(h, "<button onclick=\"go('/allon',1)\">ALL ON</button>")?;
    writeln!(h, "<button onclick=\"go('/alloff',1)\">ALL OFF</button>")?;

    writeln!(h, "<label>Running speed (ms)</label>")?;
    writeln!(
        h,
        "<input type=\"range\" min=\"{}\" max=\"{}\" value=\"{}\" oninput=\"go('/runspeed?v='+this.value)\">",
        MIN_RUNNING_SPEED_MS, MAX_RUNNING_SPEED_MS, s.running_speed_ms
    )?;

    writeln!(h, "<label>Relay count</label>")?;
    writeln!(h, "<select onchange=\"go('/count?v='+this.value,1)\">")?;
    for n in MIN_RELAYS..=MAX_RELAY_COUNT {
        writeln!(
            h,
            "<option value=\"{}\"{}>{} Channel</option>",
            n,
            selected(n == s.relay_count),
            n
        )?;
    }
    writeln!(h, "</select>")?;

    writeln!(h, "<label>Pattern</label>")?;
    writeln!(h, "<select onchange=\"go('/pattern?p='+this.value,1)\">")?;
    for p in PatternId::ALL {
        writeln!(
            h,
            "<option value=\"{}\"{}>{}</option>",
            p.index(),
            selected(p == s.pattern),
            p.name()
        )?;
    }
    writeln!(h, "</select>")?;

    writeln!(h, "<label>Auto cycle</label>")?;
    writeln!(
        h,
        "<input type=\"checkbox\"{} onchange=\"go('/auto?x='+(this.checked?1:0))\">",
        if s.auto_cycle { " checked" } else { "" }
    )?;

    writeln!(h, "<label>Blitz on / off (ms)</label>")?;
    writeln!(
        h,
        "<input id=\"bon\" type=\"number\" min=\"{lo}\" max=\"{hi}\" value=\"{}\">\
         <input id=\"boff\" type=\"number\" min=\"{lo}\" max=\"{hi}\" value=\"{}\">",
        s.blitz_on_ms,
        s.blitz_off_ms,
        lo = MIN_BLITZ_MS,
        hi = MAX_BLITZ_MS
    )?;
    writeln!(
        h,
        "<button onclick=\"go('/blitzspeed?on='+bon.value+'&off='+boff.value,1)\">SET BLITZ</button>"
    )?;
    writeln!(h, "<button onclick=\"go('/save')\">SAVE</button>")?;
    Ok(())
}
