//! The single-page UI served at `/`. Plain HTML and vanilla JS talking to
//! the JSON endpoints; no build step.

pub const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Intelligent Form Agent</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; color: #222; }
  h1 { font-size: 1.5rem; }
  section { border: 1px solid #ddd; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }
  nav button { margin-right: 0.5rem; }
  nav button.active { font-weight: bold; text-decoration: underline; }
  .tab { display: none; }
  .tab.visible { display: block; }
  .error { color: #b00020; white-space: pre-wrap; }
  .result { background: #f6f6f6; border-radius: 4px; padding: 0.75rem; white-space: pre-wrap; }
  ul#doc-list { padding-left: 1.25rem; }
  label { display: block; margin: 0.5rem 0 0.25rem; }
  input[type=text] { width: 100%; box-sizing: border-box; padding: 0.4rem; }
  select { min-width: 16rem; }
</style>
</head>
<body>
<h1>Intelligent Form Agent</h1>
<p>Upload forms (PDF/PNG/JPG/TXT) to enable automatic extraction, QA, and summarization.</p>

<section>
  <h2>1. Upload forms</h2>
  <input type="file" id="file-input" multiple>
  <button id="upload-btn">Upload</button>
  <div id="upload-status"></div>
  <h3>Processed forms</h3>
  <ul id="doc-list"></ul>
  <a href="/report" download="intelligent_form_report.json">Download full JSON report</a>
</section>

<nav>
  <button data-tab="qa" class="active">2. Single form QA</button>
  <button data-tab="summary">3. Form summary</button>
  <button data-tab="holistic">4. Holistic analysis</button>
</nav>

<section id="tab-qa" class="tab visible">
  <label for="qa-doc">Select form:</label>
  <select id="qa-doc"></select>
  <label for="qa-question">Your question (e.g. "What is the total amount due?"):</label>
  <input type="text" id="qa-question">
  <button id="qa-btn">Get answer</button>
  <div id="qa-result"></div>
</section>

<section id="tab-summary" class="tab">
  <label for="summary-doc">Select form:</label>
  <select id="summary-doc"></select>
  <button id="summary-btn">Generate summary</button>
  <div id="summary-result"></div>
</section>

<section id="tab-holistic" class="tab">
  <label for="holistic-docs">Select at least two forms (ctrl-click):</label>
  <select id="holistic-docs" multiple size="5"></select>
  <label for="holistic-prompt">Question for holistic insight (e.g. "Compare the payment deadlines."):</label>
  <input type="text" id="holistic-prompt">
  <button id="holistic-btn">Run holistic analysis</button>
  <div id="holistic-result"></div>
</section>

<script>
const $ = (id) => document.getElementById(id);

document.querySelectorAll('nav button').forEach((btn) => {
  btn.addEventListener('click', () => {
    document.querySelectorAll('nav button').forEach((b) => b.classList.remove('active'));
    document.querySelectorAll('.tab').forEach((t) => t.classList.remove('visible'));
    btn.classList.add('active');
    $('tab-' + btn.dataset.tab).classList.add('visible');
  });
});

async function postJson(url, payload) {
  const response = await fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(payload),
  });
  const body = await response.json();
  if (!response.ok) throw new Error(body.message || 'request failed');
  return body;
}

function showError(el, err) {
  el.innerHTML = '';
  const div = document.createElement('div');
  div.className = 'error';
  div.textContent = 'Error: ' + err.message;
  el.appendChild(div);
}

function showResult(el, text) {
  el.innerHTML = '';
  const div = document.createElement('div');
  div.className = 'result';
  div.textContent = text;
  el.appendChild(div);
}

async function refreshDocuments() {
  const docs = await (await fetch('/documents')).json();
  $('doc-list').innerHTML = '';
  for (const sel of ['qa-doc', 'summary-doc', 'holistic-docs']) $(sel).innerHTML = '';
  for (const doc of docs) {
    const li = document.createElement('li');
    li.textContent = `${doc.name} (${doc.format}, ${doc.text_length} characters)`;
    $('doc-list').appendChild(li);
    for (const sel of ['qa-doc', 'summary-doc', 'holistic-docs']) {
      const option = document.createElement('option');
      option.value = doc.name;
      option.textContent = doc.name;
      $(sel).appendChild(option);
    }
  }
}

$('upload-btn').addEventListener('click', async () => {
  const files = $('file-input').files;
  if (!files.length) return;
  const form = new FormData();
  for (const file of files) form.append('file', file);
  $('upload-status').textContent = 'Processing…';
  try {
    const response = await fetch('/upload', { method: 'POST', body: form });
    const body = await response.json();
    if (!response.ok) throw new Error(body.message || 'upload failed');
    const lines = body.processed.map((d) => `Processed ${d.name} (${d.text_length} characters)`);
    for (const e of body.errors) lines.push(`Error processing ${e.filename}: ${e.message}`);
    $('upload-status').textContent = lines.join('\n');
    await refreshDocuments();
  } catch (err) {
    showError($('upload-status'), err);
  }
});

$('qa-btn').addEventListener('click', async () => {
  try {
    const result = await postJson('/qa', {
      document: $('qa-doc').value,
      question: $('qa-question').value,
    });
    showResult($('qa-result'), `Answer from ${result.document}: ${result.answer}`);
  } catch (err) {
    showError($('qa-result'), err);
  }
});

$('summary-btn').addEventListener('click', async () => {
  try {
    const result = await postJson('/summary', { document: $('summary-doc').value });
    showResult($('summary-result'), `Summary of ${result.document}:\n${result.summary}`);
  } catch (err) {
    showError($('summary-result'), err);
  }
});

$('holistic-btn').addEventListener('click', async () => {
  const selected = Array.from($('holistic-docs').selectedOptions).map((o) => o.value);
  try {
    const result = await postJson('/holistic', {
      documents: selected,
      prompt: $('holistic-prompt').value,
    });
    const parts = [`Final synthesis (answer to: ${result.prompt})`, result.final_synthesis, ''];
    for (const r of result.intermediary_results) parts.push(`${r.document}: ${r.answer}`);
    showResult($('holistic-result'), parts.join('\n'));
  } catch (err) {
    showError($('holistic-result'), err);
  }
});

refreshDocuments();
</script>
</body>
</html>
"##;
