use colored::Colorize;

const RULE: &str = "============================================================";

pub fn banner() {
    println!("{RULE}");
    println!("{}", "🏢 Sistema BioAdmin HR (Consola)".bold());
    println!("{RULE}");
    println!("📊 Procesamiento de Horas Trabajadas");
    println!("🌍 Interfaz en Español - Manejo de Fechas Locales");
    println!("{RULE}");
}

const GUIDE: &str = "
📖 GUÍA DE USO RÁPIDO

🚀 Ejecución Básica:
   bioadmin-hr archivo_datos.csv

📁 Formatos Soportados:
   • CSV (.csv)
   • Excel (.xlsx, .xls)
   • Texto (.txt), separado por tabulador, coma, punto y coma o barra

📋 Estructura Esperada:
   Empleado,Fecha,Hora_Entrada,Hora_Salida
   Juan Pérez,15 de enero de 2024,08:00,17:00
   María García,16 de enero de 2024,08:30,17:30

📅 Fechas Reconocidas:
   15 de enero de 2024 · 15/ene/2024 · 15-enero-2024 · 2024-01-15 · 15/01/2024

⏱️  Horas:
   • Sin columnas de hora se asumen 8 horas por día
   • Horas vacías o no reconocidas cuentan como 8 horas
   • Si la salida es anterior a la entrada se considera turno nocturno

📊 Salida:
   • Reporte Excel con resumen ejecutivo
   • Detalle mensual por empleado
   • Análisis por empleado y estadísticas por mes

⚙️  Configuración (~/.config/bioadmin-hr/settings.json):
   output_dir   directorio para los reportes (por defecto \".\")
   low_hours    meses por debajo se marcan en rojo (por defecto 120)
   high_hours   meses por encima se marcan en azul (por defecto 200)

💡 Ejemplos:
   bioadmin-hr datos_enero.csv
   bioadmin-hr datos_trimestre.xlsx -o reporte_q1.xlsx
   bioadmin-hr --sample        # Generar archivo de ejemplo
   bioadmin-hr --init-config   # Crear configuración por defecto
";

pub fn run() {
    banner();
    println!("{GUIDE}");
}
