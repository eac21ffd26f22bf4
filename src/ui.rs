use crate::panels::{PanelId, PANELS};
use crate::storage::ThemeState;
use std::fmt::Write;

pub fn render_index(theme: ThemeState, rankings_html: &str, top_apologies_html: &str) -> String {
    INDEX_HTML
        .replace("{{BODY_CLASS}}", if theme.dark_mode { "dark" } else { "" })
        .replace("{{THEME_CHECKED}}", if theme.dark_mode { "checked" } else { "" })
        .replace("{{THEME_LABEL}}", theme.label())
        .replace("{{THEME}}", theme.name())
        .replace("{{PANELS}}", &render_panels(rankings_html, top_apologies_html))
}

fn render_panels(rankings_html: &str, top_apologies_html: &str) -> String {
    let mut out = String::new();
    for spec in &PANELS {
        let (prefill, clear) = match spec.id {
            PanelId::ExcuseRankings => (rankings_html, Some("excuse")),
            PanelId::ApologyRankings => (top_apologies_html, Some("apology")),
            _ => ("", None),
        };
        let _ = write!(
            out,
            "<button type=\"button\" class=\"toggle-btn\" data-panel=\"{dom}\">{label}</button>\
             <div class=\"toggle-box\" id=\"box-{dom}\"><ul id=\"{dom}\">{prefill}</ul>",
            dom = spec.dom_id,
            label = panel_label(spec.id),
        );
        if let Some(kind) = clear {
            let _ = write!(out, "<button type=\"button\" data-clear=\"{kind}\">Clear</button>");
        }
        out.push_str("</div>");
    }
    out
}

fn panel_label(id: PanelId) -> &'static str {
    match id {
        PanelId::ExcuseHistory => "📜 Excuse History",
        PanelId::ExcuseFavorites => "⭐ Favourite Excuses",
        PanelId::ExcuseRankings => "🏆 Top Excuses",
        PanelId::ExcuseCalendar => "📅 Excuse Calendar",
        PanelId::ApologyHistory => "📜 Apology History",
        PanelId::ApologyFavorites => "⭐ Favourite Apologies",
        PanelId::ApologyRankings => "🏆 Top Apologies",
        PanelId::ApologyCalendar => "📅 Apology Calendar",
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Intelligent Excuse Generator</title>
  <link rel="manifest" href="/static/manifest.json" />
  <link rel="stylesheet" href="/static/style.css" />
  <style>
    .toggle-box { display: none; transition: all 0.3s ease; }
    .toggle-box.open { display: block; animation: fadeIn 0.4s ease-out; }
    .busy { opacity: 0.7; pointer-events: none; }
    @keyframes fadeIn { from { opacity: 0; transform: translateY(-10px); } to { opacity: 1; transform: translateY(0); } }
    body.dark { background: #15151c; color: #eee; }
    #memorySuggest { display: none; list-style: none; padding: 0; }
    #proofImg, #downloadBtn { display: none; }
  </style>
</head>
<body class="{{BODY_CLASS}}">
  <main class="app">
    <header>
      <h1>Intelligent Excuse Generator</h1>
      <p id="timestamp"></p>
      <label><input type="checkbox" id="themeToggle" {{THEME_CHECKED}} /> <span id="themeLabel">{{THEME_LABEL}}</span></label>
    </header>

    <section class="card">
      <h2>Excuse</h2>
      <input id="scenario" placeholder="What happened?" autocomplete="off" />
      <ul id="memorySuggest"></ul>
      <select id="urgency"><option>low</option><option selected>medium</option><option>high</option></select>
      <select id="language"><option value="en">English</option><option value="hi">Hindi</option><option value="es">Spanish</option><option value="fr">French</option></select>
      <select id="excuseStyle"><option>professional</option><option>funny</option><option>dramatic</option></select>
      <button type="button" data-action="excuse">Get Excuse</button>
      <div id="excuseOut"></div>
      <div id="translatedOut"></div>
      <button type="button" data-voice="excuseOut">🔊 Listen</button>
      <button type="button" data-favorite="excuse">⭐ Save Favourite</button>
    </section>

    <section class="card">
      <h2>Apology</h2>
      <textarea id="apologyContext" placeholder="What are you sorry for?"></textarea>
      <select id="tone"><option>sincere</option><option>formal</option><option>casual</option></select>
      <select id="messageType"><option>text</option><option>email</option><option>letter</option></select>
      <select id="apologyStyle"><option>short</option><option>detailed</option></select>
      <button type="button" data-action="apology">Generate Apology</button>
      <div id="apologyOut"></div>
      <button type="button" data-voice="apologyOut">🔊 Listen</button>
      <select id="adjustTone"><option value="">Adjust tone…</option><option>formal</option><option>warm</option><option>humble</option></select>
      <button type="button" data-action="adjust-tone">🎚 Apply Tone</button>
      <input id="startApology" placeholder="Start an apology…" />
      <button type="button" data-action="complete-apology">✍ Complete</button>
      <button type="button" data-action="guilt-score">🧠 Guilt Score</button>
      <button type="button" data-favorite="apology">⭐ Save Favourite</button>
    </section>

    <section class="card">
      <h2>Proof</h2>
      <select id="screenshotTheme"><option value="light">light</option><option value="dark">dark</option></select>
      <button type="button" data-screenshot="excuse">📸 Excuse Proof</button>
      <button type="button" data-screenshot="apology">📸 Apology Proof</button>
      <img id="proofImg" alt="proof" />
      <a id="downloadBtn" href="/ui/screenshot">⬇ Download</a>
    </section>

    <section class="card">
      <h2>Emergency</h2>
      <input id="recipientEmail" type="email" placeholder="email" />
      <button type="button" data-action="emergency">🚨 Trigger Now</button>
      <input id="scheduleDate" type="date" />
      <input id="scheduleTime" type="time" />
      <button type="button" data-action="schedule">⏰ Schedule</button>
    </section>

    <section class="card panels">{{PANELS}}</section>
  </main>
  <audio id="clickSound" src="/static/click.mp3" preload="auto"></audio>

  <script>
    const $ = (id) => document.getElementById(id);
    const val = (id) => ($(id) ? $(id).value : '');

    const post = async (path, body) => {
      const res = await fetch(path, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const apply = (out, target) => {
      if (out.html !== undefined && target) $(target).innerHTML = out.html;
      if (out.translation !== undefined) $('translatedOut').innerText = out.translation;
      if (out.screenshot) {
        $('proofImg').src = out.screenshot.src + '?t=' + Date.now();
        $('proofImg').style.display = 'block';
        $('downloadBtn').setAttribute('download', out.screenshot.download);
        $('downloadBtn').style.display = 'inline-block';
      }
      if (out.alert) alert(out.alert);
    };

    const forms = {
      'excuse': () => [{ scenario: val('scenario'), urgency: val('urgency'), language: val('language'), style: val('excuseStyle') }, 'excuseOut'],
      'apology': () => [{ context: val('apologyContext'), tone: val('tone'), type: val('messageType'), style: val('apologyStyle'), language: val('language') }, 'apologyOut'],
      'adjust-tone': () => [{ tone: val('adjustTone'), sentence: $('apologyOut').innerText }, 'apologyOut'],
      'complete-apology': () => [{ start: val('startApology'), tone: val('adjustTone') }, 'apologyOut'],
      'guilt-score': () => [{ text: $('apologyOut').innerText }, null],
      'emergency': () => [{ email: val('recipientEmail') }, null],
      'schedule': () => [{ date: val('scheduleDate'), time: val('scheduleTime'), email: val('recipientEmail') }, null]
    };

    const run = async (btn, path, body, target) => {
      btn.disabled = true;
      btn.classList.add('busy');
      try {
        apply(await post(path, body), target);
      } catch (err) {
        alert(err.message);
      } finally {
        btn.disabled = false;
        btn.classList.remove('busy');
      }
    };

    document.querySelectorAll('[data-action]').forEach((btn) => {
      btn.addEventListener('click', () => {
        const [body, target] = forms[btn.dataset.action]();
        run(btn, '/ui/' + btn.dataset.action, body, target);
      });
    });
    document.querySelectorAll('[data-favorite]').forEach((btn) => {
      btn.addEventListener('click', () => run(btn, '/ui/favorite/' + btn.dataset.favorite, {}, null));
    });
    document.querySelectorAll('[data-screenshot]').forEach((btn) => {
      btn.addEventListener('click', () => run(btn, '/ui/screenshot/' + btn.dataset.screenshot, { theme: val('screenshotTheme') }, null));
    });
    document.querySelectorAll('[data-clear]').forEach((btn) => {
      btn.addEventListener('click', () => {
        if (!confirm('Erase?')) return;
        const target = btn.dataset.clear === 'excuse' ? 'rankingsList' : 'apolTopList';
        run(btn, '/ui/clear-rankings/' + btn.dataset.clear, {}, target);
      });
    });

    const speak = (target) => {
      const text = $(target) ? $(target).innerText : '';
      if (text && window.speechSynthesis) speechSynthesis.speak(new SpeechSynthesisUtterance(text));
    };
    document.querySelectorAll('[data-voice]').forEach((btn) => {
      btn.addEventListener('click', () => speak(btn.dataset.voice));
    });

    const click = () => {
      const sound = $('clickSound');
      if (sound) sound.play().catch(() => {});
    };

    document.querySelectorAll('.toggle-btn').forEach((btn) => {
      btn.addEventListener('click', async () => {
        click();
        const res = await post('/ui/panels/' + btn.dataset.panel + '/toggle');
        if (res.outcome === 'ignored') return;
        document.querySelectorAll('.toggle-box').forEach((box) => box.classList.remove('open'));
        if (res.html !== undefined) $(res.panel).innerHTML = res.html;
        if (res.open) $('box-' + res.open).classList.add('open');
      });
    });

    $('themeToggle').addEventListener('change', async (event) => {
      const theme = await post('/ui/theme', { dark_mode: event.target.checked });
      document.body.classList.toggle('dark', theme.dark_mode);
      $('themeLabel').textContent = theme.label;
      $('screenshotTheme').value = theme.name;
    });

    $('scenario').addEventListener('input', async (event) => {
      const q = event.target.value.trim();
      const suggest = $('memorySuggest');
      if (!q) { suggest.style.display = 'none'; return; }
      const res = await fetch('/ui/memory?q=' + encodeURIComponent(q));
      const html = res.ok ? await res.text() : '';
      if (!html) { suggest.style.display = 'none'; return; }
      suggest.innerHTML = html;
      suggest.style.display = 'block';
      Array.from(suggest.children).forEach((li) => {
        li.onclick = () => { event.target.value = li.innerText; suggest.style.display = 'none'; };
      });
    });

    $('timestamp').textContent = '📅 ' + new Date().toLocaleString();
    $('screenshotTheme').value = '{{THEME}}';
  </script>
</body>
</html>
"#;
