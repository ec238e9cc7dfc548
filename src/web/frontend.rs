//! Embedded HTML/CSS/JS frontend for the Martlens web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Martlens Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --cyan: #39d2c0;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app {
  max-width: 1200px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 {
  font-size: 24px;
  font-weight: 600;
  display: flex;
  align-items: center;
  gap: 10px;
}

header h1 .logo {
  color: var(--accent);
  font-family: var(--mono);
  font-weight: 700;
}

header .subtitle {
  color: var(--text-muted);
  font-size: 13px;
}

.health-badges {
  display: flex;
  gap: 8px;
}

.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}

.badge.ok { border-color: var(--green); color: var(--green); }
.badge.err { border-color: var(--red); color: var(--red); }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}

.card h2 {
  font-size: 16px;
  font-weight: 600;
  margin-bottom: 16px;
  color: var(--text);
  display: flex;
  align-items: center;
  gap: 8px;
}

.card h2 select {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--accent);
  padding: 2px 8px;
  font-size: 14px;
  font-weight: 600;
}

/* Filter bar */
.filters .filter-row {
  display: flex;
  flex-wrap: wrap;
  gap: 16px;
}

.filters label {
  display: flex;
  flex-direction: column;
  gap: 4px;
  font-size: 12px;
  color: var(--text-muted);
}

.filters input[type="date"],
.filters select {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 6px 10px;
  font-size: 13px;
  font-family: var(--mono);
  min-width: 150px;
}

.filters select[multiple] { min-height: 68px; }
.filters input:focus,
.filters select:focus { outline: none; border-color: var(--accent); }

/* Stats grid */
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}

.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}

.stat-card .value {
  font-size: 28px;
  font-weight: 700;
  font-family: var(--mono);
  color: var(--accent);
  line-height: 1.1;
}

.stat-card .value.green { color: var(--green); }
.stat-card .value.purple { color: var(--purple); }
.stat-card .value.cyan { color: var(--cyan); }

.stat-card .label {
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 6px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}

/* Distribution bar */
.dist-bar {
  display: flex;
  height: 28px;
  border-radius: 6px;
  overflow: hidden;
  margin-bottom: 12px;
}

.dist-bar .seg {
  display: flex;
  align-items: center;
  justify-content: center;
  font-size: 11px;
  font-weight: 600;
  color: #fff;
  min-width: 30px;
  transition: width 0.4s;
}

.dist-bar .seg.instore { background: var(--green); }
.dist-bar .seg.online { background: var(--purple); }
.dist-bar .seg.none { background: var(--text-muted); }

.dist-legend {
  display: flex;
  gap: 16px;
  font-size: 12px;
  color: var(--text-muted);
}

.dist-legend span::before {
  content: '';
  display: inline-block;
  width: 10px;
  height: 10px;
  border-radius: 3px;
  margin-right: 4px;
  vertical-align: middle;
}

.dist-legend .instore::before { background: var(--green); }
.dist-legend .online::before { background: var(--purple); }

/* Tables */
table {
  width: 100%;
  border-collapse: collapse;
  font-size: 13px;
}

th, td {
  text-align: left;
  padding: 8px 12px;
  border-bottom: 1px solid var(--border);
}

th {
  color: var(--text-muted);
  font-weight: 500;
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}

td { color: var(--text); }
td.mono { font-family: var(--mono); font-size: 12px; }
td.num { text-align: right; font-family: var(--mono); }
th.num { text-align: right; }

tr:hover { background: rgba(255,255,255,0.02); }

/* Bar chart */
.chart {
  display: flex;
  align-items: flex-end;
  gap: 4px;
  height: 160px;
  padding-top: 20px;
  margin-bottom: 8px;
}

.chart .bar-group {
  flex: 1;
  display: flex;
  flex-direction: column;
  align-items: center;
  height: 100%;
  justify-content: flex-end;
}

.chart .bar {
  width: 100%;
  max-width: 28px;
  background: var(--accent);
  border-radius: 3px 3px 0 0;
  min-height: 2px;
  transition: height 0.4s;
  position: relative;
}

.chart .bar:hover { opacity: 0.8; }
.chart .bar.neg { background: var(--red); }

.chart .bar-label {
  font-size: 10px;
  color: var(--text-muted);
  margin-top: 6px;
  writing-mode: vertical-rl;
  text-orientation: mixed;
  transform: rotate(180deg);
  max-height: 60px;
  overflow: hidden;
}

.chart-tooltip {
  position: absolute;
  bottom: calc(100% + 6px);
  left: 50%;
  transform: translateX(-50%);
  background: #333;
  color: #fff;
  padding: 4px 8px;
  border-radius: 4px;
  font-size: 11px;
  white-space: nowrap;
  pointer-events: none;
  opacity: 0;
  transition: opacity 0.15s;
}

.chart .bar:hover .chart-tooltip { opacity: 1; }

/* Two-column cards */
.two-col {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 16px;
}

.two-col .card { margin-bottom: 16px; }

/* Buttons */
.btn {
  display: inline-flex;
  align-items: center;
  gap: 6px;
  padding: 8px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
  transition: all 0.15s;
}

.btn:hover { border-color: var(--accent); color: var(--accent); }
.btn.primary { background: var(--accent); color: #fff; border-color: var(--accent); }
.btn.primary:hover { opacity: 0.85; }

.btn-group {
  display: flex;
  gap: 8px;
  margin-top: 16px;
}

/* Toast notification */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 12px 20px;
  border-radius: var(--radius);
  background: var(--green);
  color: #fff;
  font-weight: 500;
  font-size: 13px;
  transform: translateY(80px);
  opacity: 0;
  transition: all 0.3s;
  z-index: 1000;
}

.toast.show { transform: translateY(0); opacity: 1; }
.toast.error { background: var(--red); }

/* Empty state */
.empty {
  text-align: center;
  padding: 32px 20px;
  color: var(--text-muted);
}

.empty p { max-width: 400px; margin: 0 auto; }

/* Responsive */
@media (max-width: 768px) {
  .stats-grid { grid-template-columns: repeat(2, 1fr); }
  .two-col { grid-template-columns: 1fr; }
  .filters .filter-row { flex-direction: column; }
}
</style>
</head>
<body>
<div class="app">

  <!-- Header -->
  <header>
    <div>
      <h1><span class="logo">martlens</span> Sales Dashboard</h1>
      <div class="subtitle">Filtered views over retail transaction data</div>
    </div>
    <div class="health-badges" id="health-badges"></div>
  </header>

  <!-- Filter bar -->
  <div class="card filters">
    <div class="filter-row">
      <label>From<input type="date" id="f-from"></label>
      <label>To<input type="date" id="f-to"></label>
      <label>Channel<select id="f-channel"></select></label>
      <label>Stores<select id="f-stores" multiple></select></label>
      <label>Categories<select id="f-categories" multiple></select></label>
    </div>
    <div class="btn-group">
      <button class="btn primary" id="btn-apply">Apply Filters</button>
      <button class="btn" id="btn-clear">Clear</button>
      <button class="btn" id="btn-export">Download CSV</button>
    </div>
  </div>

  <!-- KPI cards -->
  <div class="stats-grid">
    <div class="stat-card"><div class="value green" id="kpi-revenue">&mdash;</div><div class="label">Total Revenue</div></div>
    <div class="stat-card"><div class="value" id="kpi-transactions">&mdash;</div><div class="label">Transactions</div></div>
    <div class="stat-card"><div class="value cyan" id="kpi-mean">&mdash;</div><div class="label">Mean Transaction</div></div>
    <div class="stat-card"><div class="value purple" id="kpi-customers">&mdash;</div><div class="label">Unique Customers</div></div>
  </div>

  <!-- Channel split -->
  <div class="card">
    <h2>Channel Split</h2>
    <div class="dist-bar" id="channel-bar"></div>
    <div class="dist-legend">
      <span class="instore">In-store</span>
      <span class="online">Online</span>
    </div>
  </div>

  <!-- Daily revenue -->
  <div class="card">
    <h2>Daily Revenue</h2>
    <div class="chart" id="trend-chart"></div>
    <div class="empty" id="trend-empty" style="display:none">
      <p>No transactions match the current filters.</p>
    </div>
  </div>

  <!-- Revenue breakdown -->
  <div class="card">
    <h2>Revenue by
      <select id="breakdown-dim">
        <option value="category">Category</option>
        <option value="store">Store</option>
        <option value="channel">Channel</option>
        <option value="payment">Payment Method</option>
        <option value="segment">Customer Segment</option>
        <option value="weekday">Day of Week</option>
      </select>
    </h2>
    <table>
      <thead>
        <tr><th>Group</th><th class="num">Revenue</th><th class="num">Share</th></tr>
      </thead>
      <tbody id="breakdown-tbody"></tbody>
    </table>
    <div class="empty" id="breakdown-empty" style="display:none">
      <p>No transactions match the current filters.</p>
    </div>
  </div>

  <!-- Rankings -->
  <div class="two-col">
    <div class="card">
      <h2>Top Products</h2>
      <table>
        <thead>
          <tr><th class="num">#</th><th>Product</th><th class="num">Revenue</th></tr>
        </thead>
        <tbody id="top-products-tbody"></tbody>
      </table>
    </div>
    <div class="card">
      <h2>Top Customers</h2>
      <table>
        <thead>
          <tr><th class="num">#</th><th>Customer</th><th>Segment</th><th class="num">Revenue</th></tr>
        </thead>
        <tbody id="top-customers-tbody"></tbody>
      </table>
    </div>
  </div>

  <!-- Sample -->
  <div class="card">
    <h2>Sample Transactions</h2>
    <table>
      <thead>
        <tr>
          <th>Date</th><th>Transaction</th><th>Store</th><th>Channel</th>
          <th>Product</th><th>Category</th><th class="num">Qty</th><th class="num">Revenue</th>
        </tr>
      </thead>
      <tbody id="sample-tbody"></tbody>
    </table>
    <div class="empty" id="sample-empty" style="display:none">
      <p>No transactions match the current filters.</p>
    </div>
  </div>

</div>

<!-- Toast -->
<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let currency = '$';

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(path) {
  const res = await fetch(path);
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || ('HTTP ' + res.status));
  return data;
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 4000);
}

function fmt(n) {
  if (n === undefined || n === null) return '—';
  return n.toLocaleString();
}

function money(n) {
  if (n === undefined || n === null) return 'no data';
  const sign = n < 0 ? '-' : '';
  const abs = Math.abs(n).toLocaleString(undefined, {
    minimumFractionDigits: 2,
    maximumFractionDigits: 2,
  });
  return sign + currency + abs;
}

// ---------------------------------------------------------------------------
// Filter bar
// ---------------------------------------------------------------------------
function el(id) { return document.getElementById(id); }

function selectedValues(id) {
  return [...el(id).selectedOptions].map(o => o.value);
}

function filterQuery() {
  const parts = [];
  const add = (key, value) => parts.push(key + '=' + encodeURIComponent(value));

  if (el('f-from').value) add('from', el('f-from').value);
  if (el('f-to').value) add('to', el('f-to').value);
  const channel = el('f-channel').value;
  if (channel && channel !== 'All') add('channel', channel);
  const stores = selectedValues('f-stores');
  if (stores.length) add('stores', stores.join(','));
  const categories = selectedValues('f-categories');
  if (categories.length) add('categories', categories.join(','));

  return parts.join('&');
}

async function loadFilters() {
  const catalog = await api('/api/filters');
  currency = catalog.currency || '$';

  el('f-channel').innerHTML = catalog.channels
    .map(c => `<option value="${esc(c)}">${esc(c)}</option>`).join('');
  el('f-stores').innerHTML = catalog.stores
    .map(s => `<option value="${esc(s)}">${esc(s)}</option>`).join('');
  el('f-categories').innerHTML = catalog.categories
    .map(c => `<option value="${esc(c)}">${esc(c)}</option>`).join('');

  if (catalog.date_min) {
    el('f-from').min = catalog.date_min;
    el('f-to').min = catalog.date_min;
  }
  if (catalog.date_max) {
    el('f-from').max = catalog.date_max;
    el('f-to').max = catalog.date_max;
  }
}

function clearFilters() {
  el('f-from').value = '';
  el('f-to').value = '';
  el('f-channel').value = 'All';
  [...el('f-stores').options].forEach(o => o.selected = false);
  [...el('f-categories').options].forEach(o => o.selected = false);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------
async function refresh() {
  const q = filterQuery();
  try {
    await Promise.all([
      loadSummary(q),
      loadChannels(q),
      loadTrend(q),
      loadBreakdown(q),
      loadTops(q),
      loadSample(q),
    ]);
  } catch (e) {
    toast(e.message, true);
  }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------
async function loadSummary(q) {
  const s = await api('/api/summary?' + q);
  el('kpi-revenue').textContent = money(s.total_revenue);
  el('kpi-transactions').textContent = fmt(s.transactions);
  el('kpi-mean').textContent = money(s.mean_revenue);
  el('kpi-customers').textContent = fmt(s.unique_customers);
}

async function loadChannels(q) {
  const data = await api('/api/channels?' + q);
  const bar = el('channel-bar');
  const total = data.entries.reduce((acc, e) => acc + e.transactions, 0);

  if (total === 0) {
    bar.innerHTML = '<div class="seg none" style="width:100%">No data</div>';
    return;
  }

  bar.innerHTML = data.entries.map(e => {
    const p = e.transactions / total * 100;
    const cls = e.channel === 'Online' ? 'online' : 'instore';
    return `<div class="seg ${cls}" style="width:${Math.max(p, 5)}%">${esc(e.channel)} ${fmt(e.transactions)}</div>`;
  }).join('');
}

async function loadTrend(q) {
  const data = await api('/api/trend?' + q);
  const entries = (data.entries || []).slice(-60); // at most 60 bars
  const chart = el('trend-chart');
  const empty = el('trend-empty');

  if (entries.length === 0) {
    chart.innerHTML = '';
    empty.style.display = 'block';
    return;
  }
  empty.style.display = 'none';

  const maxRevenue = Math.max(...entries.map(e => e.revenue), 1);

  chart.innerHTML = entries.map(e => {
    const h = Math.max((e.revenue / maxRevenue) * 100, 2);
    const cls = e.revenue < 0 ? 'bar neg' : 'bar';
    const label = e.date.slice(5); // MM-DD
    return `
      <div class="bar-group">
        <div class="${cls}" style="height:${h}%">
          <div class="chart-tooltip">${e.date}: ${money(e.revenue)}</div>
        </div>
        <div class="bar-label">${label}</div>
      </div>
    `;
  }).join('');
}

async function loadBreakdown(q) {
  const dim = el('breakdown-dim').value;
  const data = await api('/api/revenue?by=' + dim + (q ? '&' + q : ''));
  const tbody = el('breakdown-tbody');
  const empty = el('breakdown-empty');
  const total = data.entries.reduce((acc, e) => acc + e.revenue, 0);

  if (data.entries.length === 0) {
    tbody.innerHTML = '';
    empty.style.display = 'block';
    return;
  }
  empty.style.display = 'none';

  tbody.innerHTML = data.entries.map(e => `
    <tr>
      <td>${esc(e.key)}</td>
      <td class="num">${money(e.revenue)}</td>
      <td class="num">${total ? (e.revenue / total * 100).toFixed(1) + '%' : '—'}</td>
    </tr>
  `).join('');
}

async function loadTops(q) {
  const [products, customers] = await Promise.all([
    api('/api/top/products?' + q),
    api('/api/top/customers?' + q),
  ]);

  el('top-products-tbody').innerHTML = products.entries.map(e => `
    <tr>
      <td class="num">${e.rank}</td>
      <td>${esc(e.product)}</td>
      <td class="num">${money(e.revenue)}</td>
    </tr>
  `).join('');

  el('top-customers-tbody').innerHTML = customers.entries.map(e => `
    <tr>
      <td class="num">${e.rank}</td>
      <td class="mono">${esc(e.customer_id)}</td>
      <td>${esc(e.segment)}</td>
      <td class="num">${money(e.revenue)}</td>
    </tr>
  `).join('');
}

async function loadSample(q) {
  const data = await api('/api/sample?' + q);
  const tbody = el('sample-tbody');
  const empty = el('sample-empty');

  if (data.rows.length === 0) {
    tbody.innerHTML = '';
    empty.style.display = 'block';
    return;
  }
  empty.style.display = 'none';

  tbody.innerHTML = data.rows.map(r => `
    <tr>
      <td class="mono">${esc(r.date)}</td>
      <td class="mono">${esc(r.transaction_id)}</td>
      <td>${esc(r.store_location)}</td>
      <td>${esc(r.channel)}</td>
      <td>${esc(r.product_name)}</td>
      <td>${esc(r.product_category)}</td>
      <td class="num">${fmt(r.quantity)}</td>
      <td class="num">${money(r.line_revenue)}</td>
    </tr>
  `).join('');
}

// ---------------------------------------------------------------------------
// Health badges
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const h = await api('/api/health');
    const badges = el('health-badges');
    badges.innerHTML = h.data_ok
      ? badge(fmt(h.rows) + ' rows', 'ok') + badge(h.data_path, 'ok')
      : badge('data unavailable', 'err');
  } catch (e) {
    // Silently ignore health badge errors
  }
}

function badge(label, cls) {
  return `<span class="badge ${cls}">${esc(label)}</span>`;
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------
function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
el('btn-apply').addEventListener('click', refresh);
el('btn-clear').addEventListener('click', () => { clearFilters(); refresh(); });
el('btn-export').addEventListener('click', () => {
  const q = filterQuery();
  window.location = '/api/export' + (q ? '?' + q : '');
});
el('breakdown-dim').addEventListener('change', () => {
  loadBreakdown(filterQuery()).catch(e => toast(e.message, true));
});

(async () => {
  loadHealth();
  try {
    await loadFilters();
  } catch (e) {
    toast(e.message, true);
  }
  refresh();
})();
</script>
</body>
</html>"##;
